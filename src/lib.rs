// lib.rs - main library
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
//! The library to internalize cardinality, pseudo-boolean and parity atoms into
//! constraints over literals and to reconstruct formulas from these constraints.

pub mod prelude {
    pub use crate::AtomKind;
    pub use crate::BoolEqual;
    pub use crate::BoolImpl;
    pub use crate::Card;
    pub use crate::Config;
    pub use crate::Constraint;
    pub use crate::ConstraintSink;
    pub use crate::Context;
    pub use crate::Engine;
    pub use crate::ExprCreator;
    pub use crate::ExprNode;
    pub use crate::InternalizeError;
    pub use crate::Internalizer;
    pub use crate::Literal;
    pub use crate::LiteralAllocator;
    pub use crate::Literalizer;
    pub use crate::Pb;
    pub use crate::PbKind;
    pub use crate::Reification;
    pub use crate::ScopeQuery;
    pub use crate::Var;
    pub use crate::WLiteral;
    pub use crate::XorObserver;
    pub use crate::Xr;
}

pub mod literal;
pub use literal::{Literal, Var, WLiteral, Weight};
pub mod constraint;
pub use constraint::{Card, Constraint, ConstraintTag, Pb, Xr};
pub mod threshold;
pub use threshold::{
    at_most_to_at_least, check_integer, check_threshold, check_unsigned, complement, Terms,
};
pub mod context;
pub use context::{
    ConstraintSink, Context, LiteralAllocator, Literalizer, ScopeQuery, XorObserver,
};
pub mod expr_creator;
pub use expr_creator::{rational, ExprCreator, PbKind};
pub mod expr;
pub use expr::{AtomKind, BoolEqual, BoolImpl, ExprNode};
pub mod config;
pub use config::Config;
pub mod internalize;
pub use internalize::{InternalizeError, Internalizer, Reification};
pub mod reconstruct;
pub use reconstruct::{get_card, get_pb, get_xor, to_formula, to_formulas};
pub mod engine;
pub use engine::{ClauseEntry, Engine};
