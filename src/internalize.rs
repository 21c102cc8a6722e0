// internalize.rs - internalizer of atoms
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
//! The module to internalize cardinality, pseudo-boolean and parity atoms.
//!
//! The `Internalizer` converts an atom (with its sign and information whether it is
//! the whole asserted formula) to the normalized constraint and registers it in
//! the context. It returns reifying literal or `Reification::Asserted` if the
//! constraint has been asserted unconditionally.
//!
//! Every `<=` is rewritten to `>=` over negated literals and every `=` is split
//! to `>=` and `<=`. Negated atom at root is rewritten to its complement. Both
//! rewrites are done by the threshold module for weighted and unweighted literals.

use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::trace;

use crate::context::Context;
use crate::expr::AtomKind;
use crate::expr_creator::PbKind;
use crate::threshold::{
    at_most_to_at_least, check_integer, check_threshold, check_unsigned, complement, Terms,
};
use crate::{Config, ExprNode, Literal, Var, WLiteral, Weight};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
/// An error type.
pub enum InternalizeError {
    /// It caused if coefficient or threshold is not representable as unsigned integer.
    #[error("Unsigned coefficient expected: {0}")]
    CoefficientOverflow(BigRational),
    /// It caused if expression is not atom handled by internalizer.
    #[error("Unsupported atom kind")]
    UnsupportedAtomKind,
}

/// Result of internalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reification {
    /// Constraint is reified: literal is equivalent to atom (with its sign).
    Reified(Literal),
    /// Constraint is asserted unconditionally.
    Asserted,
}

impl Reification {
    /// Returns reifying literal if it is.
    pub fn literal(self) -> Option<Literal> {
        if let Reification::Reified(l) = self {
            Some(l)
        } else {
            None
        }
    }

    pub fn is_asserted(self) -> bool {
        matches!(self, Reification::Asserted)
    }
}

/// An internalizer of atoms. It holds only configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Internalizer {
    config: Config,
}

impl Internalizer {
    pub fn new(config: Config) -> Self {
        Internalizer { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Internalizes atom. If `sign` is true then atom is negated. If `root` is true then
    /// atom is the whole asserted formula.
    pub fn internalize<C: Context + ?Sized>(
        &self,
        ctx: &mut C,
        e: &ExprNode,
        sign: bool,
        root: bool,
    ) -> Result<Reification, InternalizeError> {
        self.internalize_with(ctx, e, sign, root, self.config.redundant)
    }

    /// Internalizes atom like `internalize`, with given redundancy of constraints.
    pub fn internalize_with<C: Context + ?Sized>(
        &self,
        ctx: &mut C,
        e: &ExprNode,
        sign: bool,
        root: bool,
        redundant: bool,
    ) -> Result<Reification, InternalizeError> {
        let mut conv = Conversion {
            ctx,
            redundant,
            root: root && self.config.root_assert,
            sign,
        };
        match e.atom_kind() {
            Some(AtomKind::Pb(kind)) => conv.internalize_pb(e, kind),
            Some(AtomKind::Iff) | Some(AtomKind::Xor) => conv.internalize_xor(e),
            None => Err(InternalizeError::UnsupportedAtomKind),
        }
    }
}

struct Conversion<'a, C: Context + ?Sized> {
    ctx: &'a mut C,
    redundant: bool,
    root: bool,
    sign: bool,
}

// terms of `>=` constraint: literals for cardinality, weighted literals for pseudo-boolean
trait GeTerms: Terms + Clone + Sized {
    fn collect<C: Context + ?Sized>(
        conv: &mut Conversion<'_, C>,
        e: &ExprNode,
    ) -> Result<Self, InternalizeError>;

    fn register<C: Context + ?Sized>(self, conv: &mut Conversion<'_, C>, var: Option<Var>, k: Weight);
}

impl GeTerms for Vec<Literal> {
    fn collect<C: Context + ?Sized>(
        conv: &mut Conversion<'_, C>,
        e: &ExprNode,
    ) -> Result<Self, InternalizeError> {
        e.args().iter().map(|arg| conv.literalize(arg)).collect()
    }

    fn register<C: Context + ?Sized>(self, conv: &mut Conversion<'_, C>, var: Option<Var>, k: Weight) {
        conv.ctx.add_at_least(var, self, k, conv.redundant);
    }
}

impl GeTerms for Vec<WLiteral> {
    fn collect<C: Context + ?Sized>(
        conv: &mut Conversion<'_, C>,
        e: &ExprNode,
    ) -> Result<Self, InternalizeError> {
        let coeffs = e.coeffs().ok_or(InternalizeError::UnsupportedAtomKind)?;
        let weights = coeffs
            .iter()
            .map(check_unsigned)
            .collect::<Result<Vec<_>, _>>()?;
        let mut wlits = Vec::with_capacity(weights.len());
        for (arg, weight) in e.args().iter().zip(weights) {
            // zero weight does not change any sum
            if weight != 0 {
                wlits.push(WLiteral::new(weight, conv.literalize(arg)?));
            }
        }
        Ok(wlits)
    }

    fn register<C: Context + ?Sized>(self, conv: &mut Conversion<'_, C>, var: Option<Var>, k: Weight) {
        conv.ctx.add_pb_ge(var, self, k, conv.redundant);
    }
}

impl<'a, C: Context + ?Sized> Conversion<'a, C> {
    // must be checked for every atom: user scopes can be opened between calls
    fn base_assert(&self) -> bool {
        self.root && self.ctx.num_user_scopes() == 0
    }

    fn literalize(&mut self, e: &ExprNode) -> Result<Literal, InternalizeError> {
        let lit = self.ctx.literalize(e, self.redundant)?;
        self.ctx.set_external(lit.var());
        Ok(lit)
    }

    fn internalize_pb(&mut self, e: &ExprNode, kind: PbKind) -> Result<Reification, InternalizeError> {
        let k = e.threshold().ok_or(InternalizeError::UnsupportedAtomKind)?;
        let unit = e.has_unit_coefficients();
        match kind {
            PbKind::AtMostK => self.convert_at_most_k(e, &k),
            PbKind::AtLeastK => self.convert_at_least_k(e, &k),
            PbKind::Le if unit => self.convert_at_most_k(e, &k),
            PbKind::Le => self.convert_pb_le(e, &k),
            PbKind::Ge if unit => self.convert_at_least_k(e, &k),
            PbKind::Ge => self.convert_pb_ge(e, &k),
            PbKind::Eq if unit => self.convert_eq_k(e, &k),
            PbKind::Eq => self.convert_pb_eq(e, &k),
        }
    }

    fn convert_pb_ge(&mut self, e: &ExprNode, k: &BigRational) -> Result<Reification, InternalizeError> {
        self.convert_ge::<Vec<WLiteral>>(e, k)
    }

    fn convert_pb_le(&mut self, e: &ExprNode, k: &BigRational) -> Result<Reification, InternalizeError> {
        self.convert_le::<Vec<WLiteral>>(e, k)
    }

    fn convert_pb_eq(&mut self, e: &ExprNode, k: &BigRational) -> Result<Reification, InternalizeError> {
        self.convert_eq::<Vec<WLiteral>>(e, k)
    }

    fn convert_at_least_k(
        &mut self,
        e: &ExprNode,
        k: &BigRational,
    ) -> Result<Reification, InternalizeError> {
        self.convert_ge::<Vec<Literal>>(e, k)
    }

    fn convert_at_most_k(
        &mut self,
        e: &ExprNode,
        k: &BigRational,
    ) -> Result<Reification, InternalizeError> {
        self.convert_le::<Vec<Literal>>(e, k)
    }

    fn convert_eq_k(&mut self, e: &ExprNode, k: &BigRational) -> Result<Reification, InternalizeError> {
        self.convert_eq::<Vec<Literal>>(e, k)
    }

    fn convert_ge<T: GeTerms>(
        &mut self,
        e: &ExprNode,
        k: &BigRational,
    ) -> Result<Reification, InternalizeError> {
        let k = BigInt::from(check_unsigned(k)?);
        let terms = T::collect(self, e)?;
        self.register_ge(e, terms, &k)
    }

    fn convert_le<T: GeTerms>(
        &mut self,
        e: &ExprNode,
        k: &BigRational,
    ) -> Result<Reification, InternalizeError> {
        // only derived threshold must be unsigned
        let k = check_integer(k)?;
        let mut terms = T::collect(self, e)?;
        let k = at_most_to_at_least(&mut terms, &k);
        self.register_ge(e, terms, &k)
    }

    fn register_ge<T: GeTerms>(
        &mut self,
        e: &ExprNode,
        mut terms: T,
        k: &BigInt,
    ) -> Result<Reification, InternalizeError> {
        let k = check_threshold(k)?;
        if self.base_assert() {
            let k = if self.sign {
                check_threshold(&complement(&mut terms, &BigInt::from(k)))?
            } else {
                k
            };
            trace!(sign = self.sign, k, terms = terms.term_count(), "assert at root");
            terms.register(self, None, k);
            return Ok(Reification::Asserted);
        }
        let v = self.ctx.add_var(true);
        terms.register(self, Some(v), k);
        let lit = Literal::positive(v);
        self.ctx.cache(e, lit);
        let lit = lit.xor_sign(self.sign);
        trace!(root = self.root, lit = %lit, k, "reified");
        Ok(Reification::Reified(lit))
    }

    fn convert_eq<T: GeTerms>(
        &mut self,
        e: &ExprNode,
        k: &BigRational,
    ) -> Result<Reification, InternalizeError> {
        let k = BigInt::from(check_unsigned(k)?);
        let ge_terms = T::collect(self, e)?;
        let ge_k = check_threshold(&k)?;
        let mut le_terms = ge_terms.clone();
        let le_k = check_threshold(&at_most_to_at_least(&mut le_terms, &k))?;
        if self.base_assert() && !self.sign {
            trace!(ge_k, le_k, "assert equality at root");
            ge_terms.register(self, None, ge_k);
            le_terms.register(self, None, le_k);
            return Ok(Reification::Asserted);
        }
        let l1 = Literal::positive(self.ctx.add_var(true));
        let l2 = Literal::positive(self.ctx.add_var(true));
        ge_terms.register(self, Some(l1.var()), ge_k);
        le_terms.register(self, Some(l2.var()), le_k);
        // l <=> l1 & l2
        let l = Literal::positive(self.ctx.add_var(false));
        self.ctx.add_clause(&[!l, l1], self.redundant);
        self.ctx.add_clause(&[!l, l2], self.redundant);
        self.ctx.add_clause(&[!l1, !l2, l], self.redundant);
        self.ctx.cache(e, l);
        let l = l.xor_sign(self.sign);
        trace!(root = self.root, lit = %l, ge_k, le_k, "equality reified");
        Ok(Reification::Reified(l))
    }

    fn internalize_xor(&mut self, e: &ExprNode) -> Result<Reification, InternalizeError> {
        let v = self.ctx.add_var(true);
        let mut lits = vec![Literal::negative(v)];
        if e.atom_kind() == Some(AtomKind::Xor) {
            for arg in e.args() {
                lits.push(self.literalize(&arg)?);
            }
        } else {
            let mut e = e.clone();
            while let Some((first, rest)) = e.as_iff() {
                lits.push(self.literalize(&first)?);
                e = rest;
            }
            lits.push(self.literalize(&e)?);
            // a <=> b is a ^ b ^ 1: flip all arguments except the last one
            let last = lits.len() - 1;
            lits[1..last].iter_mut().for_each(Literal::negate);
        }
        if let Some(observer) = self.ctx.xor_observer() {
            observer.add_xor(&lits);
        }
        trace!(args = lits.len() - 1, "parity reified");
        self.ctx.add_xr(lits, self.redundant);
        Ok(Reification::Reified(Literal::new(v, self.sign)))
    }
}
