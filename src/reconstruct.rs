// reconstruct.rs - reconstruction of formulas from constraints
//
// cardgen - Internalize cardinality, pseudo-boolean and parity constraints
// Copyright (C) 2022  Mateusz Szpakowski
//
// This library is free software; you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation; either
// version 2.1 of the License, or (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this library; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA

#![cfg_attr(docsrs, feature(doc_cfg))]
//! The module to reconstruct formulas from registered constraints.
//!
//! Every function takes an oracle that converts literal to expression.
//! If constraint has reifying literal then reconstructed formula is an equivalence
//! between expression of this literal and formula of constraint.

use std::cell::RefCell;
use std::rc::Rc;

use crate::expr_creator::rational;
use crate::{BoolEqual, Card, Constraint, ExprCreator, ExprNode, Literal, Pb, Xr};

fn reify<F>(fml: ExprNode, lit: Option<Literal>, lit2expr: &mut F) -> ExprNode
where
    F: FnMut(Literal) -> ExprNode,
{
    if let Some(l) = lit {
        lit2expr(l).equal(fml)
    } else {
        fml
    }
}

/// Reconstructs formula `at_least(k, lits)` from cardinality constraint.
pub fn get_card<F>(creator: Rc<RefCell<ExprCreator>>, c: &Card, lit2expr: &mut F) -> ExprNode
where
    F: FnMut(Literal) -> ExprNode,
{
    let args = c.iter().map(|l| lit2expr(*l)).collect::<Vec<_>>();
    let fml = ExprNode::at_least(creator, &args, c.k());
    reify(fml, c.lit(), lit2expr)
}

/// Reconstructs weighted sum formula from pseudo-boolean constraint.
///
/// Weights are kept even if all of them are 1 (possible after elision of zero
/// weights). Internalization of such formula routes it to cardinality, hence
/// it gives `Card` with the same literals and threshold instead of `Pb`.
pub fn get_pb<F>(creator: Rc<RefCell<ExprCreator>>, p: &Pb, lit2expr: &mut F) -> ExprNode
where
    F: FnMut(Literal) -> ExprNode,
{
    let terms = p
        .iter()
        .map(|wl| (rational(wl.weight), lit2expr(wl.lit)))
        .collect::<Vec<_>>();
    let fml = ExprNode::weighted_ge(creator, &terms, rational(p.k()));
    reify(fml, p.lit(), lit2expr)
}

/// Reconstructs xor of literals from parity constraint.
pub fn get_xor<F>(creator: Rc<RefCell<ExprCreator>>, x: &Xr, lit2expr: &mut F) -> ExprNode
where
    F: FnMut(Literal) -> ExprNode,
{
    let args = x.iter().map(|l| lit2expr(*l)).collect::<Vec<_>>();
    let fml = ExprNode::xor_all(creator, &args);
    reify(fml, x.lit(), lit2expr)
}

/// Reconstructs formula from any constraint.
pub fn to_formula<F>(
    creator: Rc<RefCell<ExprCreator>>,
    c: &Constraint,
    lit2expr: &mut F,
) -> ExprNode
where
    F: FnMut(Literal) -> ExprNode,
{
    match c {
        Constraint::Card(c) => get_card(creator, c, lit2expr),
        Constraint::Pb(p) => get_pb(creator, p, lit2expr),
        Constraint::Xr(x) => get_xor(creator, x, lit2expr),
    }
}

/// Reconstructs formulas from all constraints, in order of constraints.
pub fn to_formulas<'a, I, F>(
    creator: Rc<RefCell<ExprCreator>>,
    constraints: I,
    mut lit2expr: F,
) -> Vec<ExprNode>
where
    I: IntoIterator<Item = &'a Constraint>,
    F: FnMut(Literal) -> ExprNode,
{
    constraints
        .into_iter()
        .map(|c| to_formula(creator.clone(), c, &mut lit2expr))
        .collect()
}
