// literal.rs - literal module
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
//! The module with literals - elements of constraints.
//!
//! The `Var` is a boolean variable allocated by an engine. It is just an opaque index.
//! The `Literal` is a variable with polarity: positive if it asserts that variable is true,
//! negated if it asserts that variable is false. Negation flips polarity.
//! The `WLiteral` is a literal with positive weight used in pseudo-boolean sums.

use std::fmt;
use std::ops::{Neg, Not};

/// Unsigned machine integer used for weights and thresholds of constraints.
pub type Weight = u32;

/// A boolean variable. It holds index of variable allocated by an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates variable from index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Var(index)
    }

    /// Returns index of variable.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Var {
    fn from(t: u32) -> Self {
        Var(t)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// A literal. It holds variable and sign: the sign is true if variable is negated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    var: Var,
    sign: bool,
}

impl Literal {
    /// Creates literal from variable and sign. If sign is true then literal is negated.
    #[inline]
    pub const fn new(var: Var, sign: bool) -> Self {
        Literal { var, sign }
    }

    /// Creates positive literal of variable.
    #[inline]
    pub const fn positive(var: Var) -> Self {
        Literal { var, sign: false }
    }

    /// Creates negated literal of variable.
    #[inline]
    pub const fn negative(var: Var) -> Self {
        Literal { var, sign: true }
    }

    #[inline]
    pub const fn var(self) -> Var {
        self.var
    }

    /// Returns true if literal is negated.
    #[inline]
    pub const fn sign(self) -> bool {
        self.sign
    }

    /// Flips polarity of this literal in place.
    #[inline]
    pub fn negate(&mut self) {
        self.sign = !self.sign;
    }

    /// Returns literal with polarity flipped if `sign` is true.
    #[inline]
    pub fn xor_sign(self, sign: bool) -> Self {
        Literal {
            var: self.var,
            sign: self.sign != sign,
        }
    }

    /// Returns value of literal for given value of its variable.
    #[inline]
    pub fn eval(self, var_value: bool) -> bool {
        var_value != self.sign
    }

    /// Returns literal in DIMACS form: variable number (counted from 1),
    /// negative if literal is negated.
    pub fn to_dimacs(self) -> i64 {
        let v = i64::from(self.var.0) + 1;
        if self.sign {
            -v
        } else {
            v
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            var: self.var,
            sign: !self.sign,
        }
    }
}

impl Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        !self
    }
}

/// Converts variable to positive literal.
impl From<Var> for Literal {
    fn from(t: Var) -> Self {
        Literal::positive(t)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A weighted literal. It holds positive weight and literal.
///
/// Zero weight is not allowed: terms with zero weight do not affect any sum and
/// they must be elided before construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WLiteral {
    pub weight: Weight,
    pub lit: Literal,
}

impl WLiteral {
    /// Creates weighted literal. Weight must be positive.
    #[inline]
    pub fn new(weight: Weight, lit: Literal) -> Self {
        debug_assert!(weight != 0, "Zero weight in weighted literal");
        WLiteral { weight, lit }
    }
}

impl From<(Weight, Literal)> for WLiteral {
    fn from(t: (Weight, Literal)) -> Self {
        WLiteral::new(t.0, t.1)
    }
}

impl fmt::Display for WLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.weight, self.lit)
    }
}
