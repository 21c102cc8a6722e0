// engine.rs - reference clausal engine
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
//! The module with simple in-memory engine that implements whole `Context`.
//!
//! The engine stores clauses and constraints in order of registration, converts
//! boolean structure of expression to clauses (Tseitin transformation) and passes
//! atoms to the internalizer. It does not solve anything: it can only check whether
//! an assignment is a model.
//!
//! Sample usage:
//!
//! ```
//! use cardgen::{Config, Engine, ExprCreator, ExprNode};
//! let ec = ExprCreator::new();
//! let xs = (0..3).map(|_| ExprNode::variable(ec.clone())).collect::<Vec<_>>();
//! let mut engine = Engine::new(ec.clone(), Config::default());
//! engine.assert_formula(&ExprNode::at_least(ec.clone(), &xs, 2)).unwrap();
//! assert_eq!(1, engine.constraints().len());
//! assert_eq!(1, engine.to_formulas().len());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::context::{
    ConstraintSink, Context, LiteralAllocator, Literalizer, ScopeQuery, XorObserver,
};
use crate::expr_creator::Node;
use crate::{reconstruct, Card, Config, Constraint, Internalizer, Pb, Reification, Xr};
use crate::{ExprCreator, ExprNode, InternalizeError, Literal, Var, WLiteral, Weight};

/// A clause with its redundancy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClauseEntry {
    pub lits: Vec<Literal>,
    pub redundant: bool,
}

#[derive(Clone, Copy, Debug)]
struct ScopeMark {
    clauses: usize,
    constraints: usize,
    cache_trail: usize,
}

/// The reference engine. It is bound to one expression creator.
pub struct Engine {
    creator: Rc<RefCell<ExprCreator>>,
    internalizer: Internalizer,
    external: Vec<bool>,
    clauses: Vec<ClauseEntry>,
    constraints: Vec<Constraint>,
    redundant: Vec<bool>,
    cache: HashMap<usize, Literal>,
    // node index and literal cached before, restored by pop
    cache_trail: Vec<(usize, Option<Literal>)>,
    scopes: Vec<ScopeMark>,
    // expression variable -> engine variable
    expr_vars: HashMap<u32, Var>,
    // engine variable -> index of expression node
    var_exprs: HashMap<Var, usize>,
    xor_observer: Option<Box<dyn XorObserver>>,
    true_var: Var,
}

impl Engine {
    /// Creates new engine. The first variable is always true.
    pub fn new(creator: Rc<RefCell<ExprCreator>>, config: Config) -> Self {
        let true_index = creator.borrow().value(true);
        let mut engine = Engine {
            creator,
            internalizer: Internalizer::new(config),
            external: vec![],
            clauses: vec![],
            constraints: vec![],
            redundant: vec![],
            cache: HashMap::new(),
            cache_trail: vec![],
            scopes: vec![],
            expr_vars: HashMap::new(),
            var_exprs: HashMap::new(),
            xor_observer: None,
            true_var: Var::new(0),
        };
        engine.true_var = engine.add_var(false);
        engine.var_exprs.insert(engine.true_var, true_index);
        engine.add_clause(&[Literal::positive(engine.true_var)], false);
        engine
    }

    pub fn creator(&self) -> &Rc<RefCell<ExprCreator>> {
        &self.creator
    }

    pub fn internalizer(&self) -> &Internalizer {
        &self.internalizer
    }

    /// Returns literal that is always true.
    #[inline]
    pub fn true_literal(&self) -> Literal {
        Literal::positive(self.true_var)
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.external.len()
    }

    pub fn is_external(&self, var: Var) -> bool {
        self.external[var.to_usize()]
    }

    pub fn clauses(&self) -> &[ClauseEntry] {
        &self.clauses
    }

    /// Returns all registered constraints in order of registration.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns true if constraint with given index is redundant.
    pub fn is_redundant(&self, index: usize) -> bool {
        self.redundant[index]
    }

    /// Returns engine variable assigned to expression variable.
    pub fn expr_var(&self, var: u32) -> Option<Var> {
        self.expr_vars.get(&var).copied()
    }

    pub fn set_xor_observer(&mut self, observer: Box<dyn XorObserver>) {
        self.xor_observer = Some(observer);
    }

    /// Opens user scope.
    pub fn push(&mut self) {
        self.scopes.push(ScopeMark {
            clauses: self.clauses.len(),
            constraints: self.constraints.len(),
            cache_trail: self.cache_trail.len(),
        });
    }

    /// Closes user scope: clauses, constraints and cached literals added after
    /// matching `push` are removed, literals cached before are restored.
    /// Variables are kept.
    pub fn pop(&mut self) {
        if let Some(mark) = self.scopes.pop() {
            self.clauses.truncate(mark.clauses);
            self.constraints.truncate(mark.constraints);
            self.redundant.truncate(mark.constraints);
            for (index, prev) in self.cache_trail.drain(mark.cache_trail..).rev() {
                if let Some(l) = prev {
                    self.cache.insert(index, l);
                } else {
                    self.cache.remove(&index);
                }
            }
            debug!(scopes = self.scopes.len(), "pop");
        }
    }

    fn expr_var_or_new(&mut self, var: u32) -> Var {
        if let Some(v) = self.expr_vars.get(&var) {
            return *v;
        }
        let v = self.add_var(false);
        let index = self.creator.borrow().variable(var);
        self.expr_vars.insert(var, v);
        self.var_exprs.insert(v, index);
        v
    }

    fn push_constraint(&mut self, c: Constraint, redundant: bool) {
        debug!(constraint = %c, redundant, "register");
        self.constraints.push(c);
        self.redundant.push(redundant);
    }

    /// Asserts formula. Negations at top of formula are moved to sign of atom.
    pub fn assert_formula(&mut self, e: &ExprNode) -> Result<(), InternalizeError> {
        let redundant = self.internalizer.config().redundant;
        let mut e = e.clone();
        let mut sign = false;
        while let Some(inner) = e.as_negated() {
            e = inner;
            sign = !sign;
        }
        let lit = if e.atom_kind().is_some() {
            let internalizer = self.internalizer;
            match internalizer.internalize(self, &e, sign, true)? {
                Reification::Reified(l) => l,
                Reification::Asserted => return Ok(()),
            }
        } else {
            self.literalize(&e, redundant)?.xor_sign(sign)
        };
        self.add_clause(&[lit], redundant);
        Ok(())
    }

    /// Returns true if all clauses and constraints are satisfied by assignment
    /// (indexed by engine variables).
    pub fn is_model(&self, values: &[bool]) -> bool {
        let value = |l: Literal| l.eval(values[l.var().to_usize()]);
        self.clauses
            .iter()
            .all(|c| c.lits.iter().any(|l| value(*l)))
            && self.constraints.iter().all(|c| c.is_sat(value))
    }

    /// Returns expression of literal. Variable that is not assigned to any expression
    /// gets new expression variable.
    pub fn lit2expr(&mut self, lit: Literal) -> ExprNode {
        let index = if let Some(index) = self.var_exprs.get(&lit.var()) {
            *index
        } else {
            let index = self.creator.borrow_mut().new_variable();
            let var = self.creator.borrow().var_count() - 1;
            self.expr_vars.insert(var, lit.var());
            self.var_exprs.insert(lit.var(), index);
            index
        };
        let e = ExprNode::new(self.creator.clone(), index);
        if lit.sign() {
            !e
        } else {
            e
        }
    }

    /// Reconstructs formulas of all registered constraints. Clauses and constraints
    /// are not changed, only new expression variables can be assigned.
    pub fn to_formulas(&mut self) -> Vec<ExprNode> {
        let constraints = self.constraints.clone();
        let creator = self.creator.clone();
        reconstruct::to_formulas(creator, &constraints, |l| self.lit2expr(l))
    }

    fn tseitin(&mut self, node: &Node, redundant: bool) -> Result<Literal, InternalizeError> {
        let (a, b) = match node {
            Node::And(a, b) | Node::Or(a, b) | Node::Impl(a, b) => (*a, *b),
            _ => return Err(InternalizeError::UnsupportedAtomKind),
        };
        let la = self.literalize(&ExprNode::new(self.creator.clone(), a), redundant)?;
        let lb = self.literalize(&ExprNode::new(self.creator.clone(), b), redundant)?;
        let v = Literal::positive(self.add_var(false));
        match node {
            Node::And(_, _) => {
                self.add_clause(&[!v, la], redundant);
                self.add_clause(&[!v, lb], redundant);
                self.add_clause(&[!la, !lb, v], redundant);
            }
            Node::Or(_, _) => {
                self.add_clause(&[!v, la, lb], redundant);
                self.add_clause(&[!la, v], redundant);
                self.add_clause(&[!lb, v], redundant);
            }
            _ => {
                self.add_clause(&[!v, !la, lb], redundant);
                self.add_clause(&[la, v], redundant);
                self.add_clause(&[!lb, v], redundant);
            }
        }
        Ok(v)
    }
}

impl LiteralAllocator for Engine {
    fn add_var(&mut self, external: bool) -> Var {
        self.external.push(external);
        Var::new((self.external.len() - 1) as u32)
    }

    fn set_external(&mut self, var: Var) {
        self.external[var.to_usize()] = true;
    }
}

impl ScopeQuery for Engine {
    fn num_user_scopes(&self) -> usize {
        self.scopes.len()
    }
}

impl ConstraintSink for Engine {
    fn add_clause(&mut self, lits: &[Literal], redundant: bool) {
        self.clauses.push(ClauseEntry {
            lits: lits.to_vec(),
            redundant,
        });
    }

    fn add_at_least(&mut self, var: Option<Var>, lits: Vec<Literal>, k: Weight, redundant: bool) {
        let c = Card::new(var.map(Literal::positive), lits, k);
        self.push_constraint(c.into(), redundant);
    }

    fn add_pb_ge(&mut self, var: Option<Var>, wlits: Vec<WLiteral>, k: Weight, redundant: bool) {
        let p = Pb::new(var.map(Literal::positive), wlits, k);
        self.push_constraint(p.into(), redundant);
    }

    fn add_xr(&mut self, lits: Vec<Literal>, redundant: bool) {
        self.push_constraint(Xr::new(None, lits).into(), redundant);
    }
}

impl Literalizer for Engine {
    fn literalize(&mut self, e: &ExprNode, redundant: bool) -> Result<Literal, InternalizeError> {
        if let Some(l) = self.cache.get(&e.index()) {
            return Ok(*l);
        }
        let node = e.node();
        let lit = match &node {
            Node::Value(v) => return Ok(self.true_literal().xor_sign(!v)),
            Node::Variable(var) => return Ok(Literal::positive(self.expr_var_or_new(*var))),
            Node::Negated(a) => {
                let inner = ExprNode::new(self.creator.clone(), *a);
                return Ok(!self.literalize(&inner, redundant)?);
            }
            Node::And(_, _) | Node::Or(_, _) | Node::Impl(_, _) => {
                self.tseitin(&node, redundant)?
            }
            Node::Equal(_, _) | Node::Xor(_) | Node::Pb { .. } => {
                let internalizer = self.internalizer;
                match internalizer.internalize_with(self, e, false, false, redundant)? {
                    Reification::Reified(l) => l,
                    Reification::Asserted => self.true_literal(),
                }
            }
        };
        self.cache(e, lit);
        Ok(lit)
    }

    fn cache(&mut self, e: &ExprNode, lit: Literal) {
        let prev = self.cache.insert(e.index(), lit);
        if !self.scopes.is_empty() && prev != Some(lit) {
            self.cache_trail.push((e.index(), prev));
        }
    }
}

impl Context for Engine {
    fn xor_observer(&mut self) -> Option<&mut dyn XorObserver> {
        if let Some(observer) = self.xor_observer.as_mut() {
            let observer: &mut dyn XorObserver = observer.as_mut();
            Some(observer)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr_creator::rational;
    use crate::{BoolEqual, BoolImpl};
    use num_rational::BigRational;

    fn setup(n: usize, config: Config) -> (Rc<RefCell<ExprCreator>>, Engine, Vec<ExprNode>) {
        let ec = ExprCreator::new();
        let xs = (0..n).map(|_| ExprNode::variable(ec.clone())).collect();
        let engine = Engine::new(ec.clone(), config);
        (ec, engine, xs)
    }

    // Returns true if engine has model that assigns given values to expression variables.
    fn has_model(engine: &Engine, expr_values: &[bool]) -> bool {
        let n = engine.num_vars();
        (0..1u64 << n).any(|mask| {
            let values = (0..n).map(|i| (mask & (1 << i)) != 0).collect::<Vec<_>>();
            (0..expr_values.len() as u32).all(|i| {
                engine
                    .expr_var(i)
                    .map_or(true, |v| values[v.to_usize()] == expr_values[i as usize])
            }) && engine.is_model(&values)
        })
    }

    fn assignments(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0..1u32 << n).map(move |mask| (0..n).map(|i| (mask & (1 << i)) != 0).collect())
    }

    fn check_equisatisfiable(ec: &Rc<RefCell<ExprCreator>>, engine: &Engine, fml: &ExprNode) {
        let n = ec.borrow().var_count() as usize;
        for values in assignments(n) {
            assert_eq!(fml.eval(&values), has_model(engine, &values), "{:?}", values);
        }
    }

    fn weighted(xs: &[ExprNode], weights: &[i64]) -> Vec<(BigRational, ExprNode)> {
        xs.iter()
            .zip(weights.iter())
            .map(|(x, w)| (rational(*w), x.clone()))
            .collect()
    }

    fn atoms(ec: &Rc<RefCell<ExprCreator>>, xs: &[ExprNode]) -> Vec<ExprNode> {
        vec![
            ExprNode::at_least(ec.clone(), xs, 2),
            ExprNode::at_most(ec.clone(), xs, 1),
            ExprNode::exactly(ec.clone(), xs, 2),
            ExprNode::at_least(ec.clone(), xs, 0),
            ExprNode::at_most(ec.clone(), xs, 4),
            ExprNode::weighted_ge(ec.clone(), &weighted(xs, &[2, 3, 4]), rational(5)),
            ExprNode::weighted_le(ec.clone(), &weighted(xs, &[2, 3, 4]), rational(5)),
            ExprNode::weighted_eq(ec.clone(), &weighted(xs, &[2, 3, 4]), rational(6)),
            ExprNode::weighted_ge(ec.clone(), &weighted(xs, &[1, 1, 1]), rational(3)),
            ExprNode::weighted_le(ec.clone(), &weighted(xs, &[0, 5, 2]), rational(2)),
            xs[0].clone().equal(xs[1].clone().equal(xs[2].clone())),
            xs[0].clone().equal(xs[1].clone()),
            ExprNode::xor_all(ec.clone(), xs),
        ]
    }

    #[test]
    fn test_engine_new() {
        let (_, engine, _) = setup(0, Config::default());
        assert_eq!(1, engine.num_vars());
        assert!(!engine.is_external(engine.true_literal().var()));
        assert_eq!(
            vec![ClauseEntry {
                lits: vec![engine.true_literal()],
                redundant: false
            }],
            engine.clauses()
        );
        assert!(engine.is_model(&[true]));
        assert!(!engine.is_model(&[false]));
    }

    #[test]
    fn test_assert_atoms() {
        for root_assert in [false, true] {
            for negated in [false, true] {
                for i in 0..13 {
                    let config = Config::new().with_root_assert(root_assert);
                    let (ec, mut engine, xs) = setup(3, config);
                    let atom = atoms(&ec, &xs)[i].clone();
                    let fml = if negated { !atom } else { atom };
                    engine.assert_formula(&fml).unwrap();
                    check_equisatisfiable(&ec, &engine, &fml);
                }
            }
        }
    }

    #[test]
    fn test_assert_nested_atoms() {
        let (ec, mut engine, xs) = setup(4, Config::default());
        let card = ExprNode::at_least(ec.clone(), &xs[0..3], 2);
        let pb = ExprNode::weighted_le(ec.clone(), &weighted(&xs[1..4], &[3, 1, 2]), rational(3));
        let fml = (card.clone() | !xs[3].clone()).imp(pb.clone() ^ xs[0].clone());
        engine.assert_formula(&fml).unwrap();
        assert_eq!(3, engine.constraints().len());
        // cardinality and pseudo-boolean are reified, parity holds its variable inside
        assert!(engine.constraints()[..2].iter().all(|c| c.lit().is_some()));
        assert!(matches!(engine.constraints()[2], Constraint::Xr(_)));
        check_equisatisfiable(&ec, &engine, &fml);
        // atom is cached
        let before = engine.constraints().len();
        let fml2 = card & xs[3].clone();
        engine.assert_formula(&fml2).unwrap();
        assert_eq!(before, engine.constraints().len());
    }

    #[test]
    fn test_root_transparency() {
        for i in 0..13 {
            for sign in [false, true] {
                let (ec, mut root_engine, xs) = setup(3, Config::default());
                let atom = atoms(&ec, &xs)[i].clone();
                let internalizer = Internalizer::default();
                let r = internalizer
                    .internalize(&mut root_engine, &atom, sign, true)
                    .unwrap();
                if let Some(l) = r.literal() {
                    root_engine.add_clause(&[l], false);
                }
                let mut engine = Engine::new(ec.clone(), Config::default());
                let l = internalizer
                    .internalize(&mut engine, &atom, sign, false)
                    .unwrap()
                    .literal()
                    .unwrap();
                engine.add_clause(&[l], false);
                for values in assignments(3) {
                    assert_eq!(
                        has_model(&root_engine, &values),
                        has_model(&engine, &values),
                        "{} {:?}",
                        i,
                        values
                    );
                }
            }
        }
    }

    #[test]
    fn test_negation_round_trip() {
        for i in 0..13 {
            let (ec, mut engine, xs) = setup(3, Config::default());
            let atom = atoms(&ec, &xs)[i].clone();
            let l = Internalizer::default()
                .internalize(&mut engine, &atom, true, false)
                .unwrap()
                .literal()
                .unwrap();
            engine.add_clause(&[!l], false);
            // negated literal of negated atom is atom
            check_equisatisfiable(&ec, &engine, &atom);
        }
    }

    #[test]
    fn test_equality_decomposition() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let atom = ExprNode::exactly(ec.clone(), &xs, 1);
        engine.assert_formula(&atom).unwrap();
        let (ge, le) = match engine.constraints() {
            [Constraint::Card(ge), Constraint::Card(le)] => (ge.clone(), le.clone()),
            _ => panic!("Unexpected constraints"),
        };
        assert_eq!((1, 2), (ge.k(), le.k()));
        for values in assignments(3) {
            let value = |l: Literal| {
                (0..3u32)
                    .find(|i| engine.expr_var(*i) == Some(l.var()))
                    .map_or(true, |i| l.eval(values[i as usize]))
            };
            assert_eq!(atom.eval(&values), ge.holds(value) && le.holds(value));
        }
    }

    #[test]
    fn test_parity_true_chain() {
        let (_, mut engine, xs) = setup(3, Config::default());
        let fml = xs[0].clone().equal(xs[1].clone().equal(xs[2].clone()));
        engine.assert_formula(&fml).unwrap();
        assert!(has_model(&engine, &[true, true, true]));
        assert!(!has_model(&engine, &[true, true, false]));
    }

    #[test]
    fn test_overflow() {
        let (ec, mut engine, xs) = setup(2, Config::default());
        let big = i64::from(u32::MAX) + 1;
        let atom = ExprNode::weighted_ge(ec.clone(), &weighted(&xs, &[big, 1]), rational(1));
        assert_eq!(
            Err(InternalizeError::CoefficientOverflow(rational(big))),
            engine.assert_formula(&(atom | xs[0].clone()))
        );
    }

    #[test]
    fn test_scopes() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let atom = ExprNode::at_least(ec.clone(), &xs, 2);
        engine.push();
        engine.assert_formula(&(atom.clone() | xs[0].clone())).unwrap();
        assert_eq!(1, engine.num_user_scopes());
        assert_eq!(1, engine.constraints().len());
        engine.pop();
        assert_eq!(0, engine.num_user_scopes());
        assert!(engine.constraints().is_empty());
        assert_eq!(1, engine.clauses().len());
        // cached literal is removed with scope
        engine.assert_formula(&(atom | xs[1].clone())).unwrap();
        assert_eq!(1, engine.constraints().len());
        engine.pop();
        assert_eq!(1, engine.constraints().len());
    }

    #[test]
    fn test_scopes_restore_cached_literal() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let atom = ExprNode::at_least(ec.clone(), &xs, 2);
        let l = engine.literalize(&atom, false).unwrap();
        engine.push();
        // root atom inside scope gets new reifying literal
        engine.assert_formula(&atom).unwrap();
        assert_eq!(2, engine.constraints().len());
        assert_ne!(Some(l), engine.constraints()[1].lit());
        engine.pop();
        assert_eq!(1, engine.constraints().len());
        assert_eq!(Ok(l), engine.literalize(&atom, false));
        assert_eq!(Some(l), engine.constraints()[0].lit());
        let fml = atom & xs[1].clone();
        engine.assert_formula(&fml).unwrap();
        assert_eq!(1, engine.constraints().len());
        check_equisatisfiable(&ec, &engine, &fml);
    }

    #[test]
    fn test_nested_scopes() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let atom = ExprNode::at_most(ec.clone(), &xs, 1);
        engine.push();
        let l1 = engine.literalize(&atom, false).unwrap();
        engine.push();
        engine.assert_formula(&atom).unwrap();
        engine.pop();
        assert_eq!(Ok(l1), engine.literalize(&atom, false));
        engine.pop();
        assert!(engine.constraints().is_empty());
        let l2 = engine.literalize(&atom, false).unwrap();
        assert_ne!(l1, l2);
        assert_eq!(Some(l2), engine.constraints()[0].lit());
    }

    #[test]
    fn test_lit2expr() {
        let (ec, mut engine, xs) = setup(2, Config::default());
        engine.assert_formula(&(xs[0].clone() ^ xs[1].clone())).unwrap();
        let x0 = Literal::positive(engine.expr_var(0).unwrap());
        assert_eq!(xs[0], engine.lit2expr(x0));
        assert_eq!(Some(xs[0].clone()), engine.lit2expr(!x0).as_negated());
        assert_eq!(Some(true), engine.lit2expr(engine.true_literal()).as_value());
        assert_eq!(Some(false), engine.lit2expr(!engine.true_literal()).as_value());
        let v = engine.constraints()[0].lit().unwrap_or_else(|| {
            match &engine.constraints()[0] {
                Constraint::Xr(x) => !x.lits()[0],
                _ => panic!("Unexpected constraint"),
            }
        });
        let e = engine.lit2expr(v);
        assert_eq!(Some(2), e.as_variable());
        assert_eq!(Some(v.var()), engine.expr_var(2));
        assert_eq!(e, engine.lit2expr(v));
        assert_eq!(3, ec.borrow().var_count());
    }

    #[test]
    fn test_to_formulas() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let mut formulas = atoms(&ec, &xs);
        formulas.push(!ExprNode::at_least(ec.clone(), &xs, 2));
        formulas.push(ExprNode::at_most(ec.clone(), &xs, 2) | xs[0].clone());
        for fml in &formulas {
            engine.assert_formula(fml).unwrap();
        }
        let constraints = engine.constraints().to_vec();
        let clauses = engine.clauses().to_vec();
        let fmls = engine.to_formulas();
        assert_eq!(constraints.len(), fmls.len());
        assert_eq!(constraints, engine.constraints());
        assert_eq!(clauses, engine.clauses());
        let n = ec.borrow().var_count() as usize;
        let m = engine.num_vars();
        let expr_values = |values: &[bool]| {
            (0..n as u32)
                .map(|i| engine.expr_var(i).map_or(false, |v| values[v.to_usize()]))
                .collect::<Vec<_>>()
        };
        for mask in 0..1u64 << m {
            let values = (0..m).map(|i| (mask & (1 << i)) != 0).collect::<Vec<_>>();
            let evalues = expr_values(&values);
            let value = |l: Literal| l.eval(values[l.var().to_usize()]);
            for (c, f) in constraints.iter().zip(fmls.iter()) {
                assert_eq!(c.is_sat(value), f.eval(&evalues), "{}", c);
            }
        }
    }

    #[test]
    fn test_reinternalize_unit_weights() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let atom = ExprNode::weighted_ge(ec.clone(), &weighted(&xs, &[0, 1, 1]), rational(1));
        engine.assert_formula(&atom).unwrap();
        let p = match &engine.constraints()[0] {
            Constraint::Pb(p) => p.clone(),
            c => panic!("Unexpected constraint: {}", c),
        };
        assert!(p.iter().all(|wl| wl.weight == 1));
        let fmls = engine.to_formulas();
        let before = engine.constraints().len();
        Internalizer::default()
            .internalize(&mut engine, &fmls[0], false, true)
            .unwrap();
        let lits = p.iter().map(|wl| wl.lit).collect::<Vec<_>>();
        assert_eq!(
            Constraint::Card(Card::new(None, lits, p.k())),
            engine.constraints()[before]
        );
    }

    #[test]
    fn test_reinternalize_formulas() {
        let (ec, mut engine, xs) = setup(3, Config::default());
        let mut formulas = atoms(&ec, &xs);
        let pb = ExprNode::weighted_ge(ec.clone(), &weighted(&xs, &[2, 3, 4]), rational(5));
        formulas.push(pb | xs[0].clone());
        for fml in &formulas {
            engine.assert_formula(fml).unwrap();
        }
        let constraints = engine.constraints().to_vec();
        let fmls = engine.to_formulas();
        for (c, f) in constraints.iter().zip(fmls.iter()) {
            // skip reifying equivalence
            let f = if c.lit().is_some() {
                f.as_iff().unwrap().1
            } else {
                f.clone()
            };
            let internalizer = Internalizer::default();
            let before = engine.constraints().len();
            let r = internalizer.internalize(&mut engine, &f, false, true).unwrap();
            let c2 = engine.constraints()[before].clone();
            match (c, &c2) {
                (Constraint::Card(a), Constraint::Card(b)) => {
                    assert!(r.is_asserted());
                    assert_eq!((a.lits(), a.k()), (b.lits(), b.k()));
                }
                (Constraint::Pb(a), Constraint::Pb(b)) => {
                    assert!(r.is_asserted());
                    assert_eq!((a.wlits(), a.k()), (b.wlits(), b.k()));
                }
                (Constraint::Xr(a), Constraint::Xr(b)) => {
                    // new reifying literal is the first one
                    assert_eq!(a.lits(), &b.lits()[1..]);
                }
                _ => panic!("Different constraint: {} {}", c, c2),
            }
        }
    }
}
