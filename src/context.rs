// context.rs - context of internalization
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
//! The module with traits of engine used by internalizer.
//!
//! The internalizer does not hold any engine. Everything it needs is passed
//! as a context that implements `Context`:
//!
//! * `LiteralAllocator` - allocates fresh variables,
//! * `ScopeQuery` - tells whether user (retractable) scope is open,
//! * `ConstraintSink` - takes clauses and constraints,
//! * `Literalizer` - converts boolean subexpressions to literals.

use crate::{ExprNode, InternalizeError, Literal, Var, WLiteral, Weight};

pub trait LiteralAllocator {
    /// Allocates fresh variable. An external variable is visible in model,
    /// otherwise it is auxiliary.
    fn add_var(&mut self, external: bool) -> Var;
    /// Marks variable as external.
    fn set_external(&mut self, var: Var);
}

pub trait ScopeQuery {
    /// Returns number of open user scopes.
    fn num_user_scopes(&self) -> usize;
}

/// Receiver of clauses and constraints. It takes ownership of passed constraint data.
///
/// If reifying variable is `None` then constraint is asserted unconditionally.
pub trait ConstraintSink {
    fn add_clause(&mut self, lits: &[Literal], redundant: bool);
    /// Registers cardinality constraint: at least `k` of literals are true.
    fn add_at_least(&mut self, var: Option<Var>, lits: Vec<Literal>, k: Weight, redundant: bool);
    /// Registers pseudo-boolean constraint: sum of weights of true literals is at least `k`.
    fn add_pb_ge(&mut self, var: Option<Var>, wlits: Vec<WLiteral>, k: Weight, redundant: bool);
    /// Registers parity constraint: odd number of literals are true.
    fn add_xr(&mut self, lits: Vec<Literal>, redundant: bool);
}

pub trait Literalizer {
    /// Converts boolean subexpression to literal.
    fn literalize(&mut self, e: &ExprNode, redundant: bool) -> Result<Literal, InternalizeError>;
    /// Remembers literal of expression. Default implementation does nothing.
    fn cache(&mut self, _e: &ExprNode, _lit: Literal) {}
}

/// An observer that is notified of every registered parity constraint.
pub trait XorObserver {
    fn add_xor(&mut self, lits: &[Literal]);
}

pub trait Context: LiteralAllocator + ScopeQuery + ConstraintSink + Literalizer {
    /// Returns observer of parity constraints if it is attached.
    fn xor_observer(&mut self) -> Option<&mut dyn XorObserver> {
        None
    }
}
