// threshold.rs - threshold arithmetic
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
//! The module with threshold arithmetic for cardinality and pseudo-boolean constraints.
//!
//! All arithmetic is done on unbounded integers and only final values are converted
//! to the `Weight` by `check_unsigned` or `check_threshold`. Both rewrites used by
//! internalizer (complement and at-most to at-least) are defined here only once
//! for any collection of terms (`Terms`).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};

use crate::{InternalizeError, Literal, WLiteral, Weight};

/// Converts rational coefficient to weight. It returns error if the rational
/// is not integer, is negative or is greater than maximal weight.
pub fn check_unsigned(c: &BigRational) -> Result<Weight, InternalizeError> {
    if c.is_integer() {
        if let Some(w) = c.to_integer().to_u32() {
            return Ok(w);
        }
    }
    Err(InternalizeError::CoefficientOverflow(c.clone()))
}

/// Converts rational threshold to integer. Sign is not checked: the threshold of
/// `<=` is validated after rewriting to `>=`.
pub fn check_integer(k: &BigRational) -> Result<BigInt, InternalizeError> {
    if k.is_integer() {
        Ok(k.to_integer())
    } else {
        Err(InternalizeError::CoefficientOverflow(k.clone()))
    }
}

/// Converts derived threshold to weight. A threshold below zero makes `>=` constraint
/// trivially satisfied, hence it is clamped to zero.
pub fn check_threshold(k: &BigInt) -> Result<Weight, InternalizeError> {
    if k.is_negative() {
        return Ok(0);
    }
    k.to_u32()
        .ok_or_else(|| InternalizeError::CoefficientOverflow(BigRational::from_integer(k.clone())))
}

/// Collection of terms summed by `>=` constraint.
///
/// It is implemented for unweighted literals (every literal has weight 1) and
/// for weighted literals.
pub trait Terms {
    /// Returns number of terms.
    fn term_count(&self) -> usize;
    /// Returns sum of weights of all terms.
    fn total_weight(&self) -> BigInt;
    /// Negates every literal.
    fn negate_all(&mut self);
}

impl Terms for Vec<Literal> {
    fn term_count(&self) -> usize {
        self.len()
    }

    fn total_weight(&self) -> BigInt {
        BigInt::from(self.len())
    }

    fn negate_all(&mut self) {
        self.iter_mut().for_each(Literal::negate);
    }
}

impl Terms for Vec<WLiteral> {
    fn term_count(&self) -> usize {
        self.len()
    }

    fn total_weight(&self) -> BigInt {
        self.iter().map(|wl| BigInt::from(wl.weight)).sum()
    }

    fn negate_all(&mut self) {
        self.iter_mut().for_each(|wl| wl.lit.negate());
    }
}

/// Rewrites `sum(terms) <= k` to `sum(negated terms) >= total - k`.
/// Negates terms in place and returns new threshold.
pub fn at_most_to_at_least<T: Terms>(terms: &mut T, k: &BigInt) -> BigInt {
    terms.negate_all();
    terms.total_weight() - k
}

/// Rewrites `not (sum(terms) >= k)` to `sum(negated terms) >= total - k + 1`.
/// Negates terms in place and returns new threshold.
pub fn complement<T: Terms>(terms: &mut T, k: &BigInt) -> BigInt {
    terms.negate_all();
    terms.total_weight() + 1 - k
}
