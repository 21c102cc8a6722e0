// constraint.rs - constraint module
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
//! The module with normalized constraints.
//!
//! Every constraint can have reifying literal. If it has, then the constraint is
//! satisfied iff the reifying literal is true. If it has not, then the constraint is
//! asserted unconditionally.
//!
//! * `Card` - at least `k` literals are true.
//! * `Pb` - sum of weights of true literals is at least `k`.
//! * `Xr` - number of true literals is odd.

use std::fmt;

use crate::{Literal, WLiteral, Weight};

/// A cardinality constraint: at least `k` of literals are true.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    lit: Option<Literal>,
    lits: Vec<Literal>,
    k: Weight,
}

impl Card {
    pub fn new(lit: Option<Literal>, lits: Vec<Literal>, k: Weight) -> Self {
        Card { lit, lits, k }
    }

    /// Returns reifying literal if it is.
    #[inline]
    pub fn lit(&self) -> Option<Literal> {
        self.lit
    }

    #[inline]
    pub fn lits(&self) -> &[Literal] {
        &self.lits
    }

    #[inline]
    pub fn k(&self) -> Weight {
        self.k
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.lits.iter()
    }

    /// Returns true if constraint (without reification) holds for the given values.
    pub fn holds<F: Fn(Literal) -> bool>(&self, value: F) -> bool {
        self.lits.iter().filter(|l| value(**l)).count() as u64 >= u64::from(self.k)
    }
}

/// A pseudo-boolean constraint: sum of weights of true literals is at least `k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pb {
    lit: Option<Literal>,
    wlits: Vec<WLiteral>,
    k: Weight,
}

impl Pb {
    pub fn new(lit: Option<Literal>, wlits: Vec<WLiteral>, k: Weight) -> Self {
        Pb { lit, wlits, k }
    }

    /// Returns reifying literal if it is.
    #[inline]
    pub fn lit(&self) -> Option<Literal> {
        self.lit
    }

    #[inline]
    pub fn wlits(&self) -> &[WLiteral] {
        &self.wlits
    }

    #[inline]
    pub fn k(&self) -> Weight {
        self.k
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.wlits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.wlits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WLiteral> {
        self.wlits.iter()
    }

    /// Returns true if constraint (without reification) holds for the given values.
    pub fn holds<F: Fn(Literal) -> bool>(&self, value: F) -> bool {
        self.wlits
            .iter()
            .filter(|wl| value(wl.lit))
            .map(|wl| u64::from(wl.weight))
            .sum::<u64>()
            >= u64::from(self.k)
    }
}

/// A parity constraint: odd number of literals are true.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xr {
    lit: Option<Literal>,
    lits: Vec<Literal>,
}

impl Xr {
    pub fn new(lit: Option<Literal>, lits: Vec<Literal>) -> Self {
        Xr { lit, lits }
    }

    /// Returns reifying literal if it is.
    #[inline]
    pub fn lit(&self) -> Option<Literal> {
        self.lit
    }

    #[inline]
    pub fn lits(&self) -> &[Literal] {
        &self.lits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.lits.iter()
    }

    /// Returns true if constraint (without reification) holds for the given values.
    pub fn holds<F: Fn(Literal) -> bool>(&self, value: F) -> bool {
        self.lits.iter().filter(|l| value(**l)).count() & 1 != 0
    }
}

/// Tag of constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintTag {
    Card,
    Pb,
    Xr,
}

/// A constraint registered in an engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Card(Card),
    Pb(Pb),
    Xr(Xr),
}

impl Constraint {
    pub fn tag(&self) -> ConstraintTag {
        match self {
            Constraint::Card(_) => ConstraintTag::Card,
            Constraint::Pb(_) => ConstraintTag::Pb,
            Constraint::Xr(_) => ConstraintTag::Xr,
        }
    }

    /// Returns reifying literal if it is.
    pub fn lit(&self) -> Option<Literal> {
        match self {
            Constraint::Card(c) => c.lit(),
            Constraint::Pb(p) => p.lit(),
            Constraint::Xr(x) => x.lit(),
        }
    }

    /// Returns true if constraint with its reification is satisfied for the given values:
    /// if reifying literal exists then it must be equal to constraint's value,
    /// otherwise the constraint must hold.
    pub fn is_sat<F: Fn(Literal) -> bool>(&self, value: F) -> bool {
        let holds = match self {
            Constraint::Card(c) => c.holds(&value),
            Constraint::Pb(p) => p.holds(&value),
            Constraint::Xr(x) => x.holds(&value),
        };
        match self.lit() {
            Some(l) => value(l) == holds,
            None => holds,
        }
    }
}

impl From<Card> for Constraint {
    fn from(t: Card) -> Self {
        Constraint::Card(t)
    }
}

impl From<Pb> for Constraint {
    fn from(t: Pb) -> Self {
        Constraint::Pb(t)
    }
}

impl From<Xr> for Constraint {
    fn from(t: Xr) -> Self {
        Constraint::Xr(t)
    }
}

fn write_reified(f: &mut fmt::Formatter<'_>, lit: Option<Literal>) -> fmt::Result {
    if let Some(l) = lit {
        write!(f, "{} == ", l)?;
    }
    Ok(())
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_reified(f, self.lit())?;
        match self {
            Constraint::Card(c) => {
                f.write_str("[")?;
                for (i, l) in c.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", l)?;
                }
                write!(f, "] >= {}", c.k())
            }
            Constraint::Pb(p) => {
                for (i, wl) in p.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{}", wl)?;
                }
                write!(f, " >= {}", p.k())
            }
            Constraint::Xr(x) => {
                for (i, l) in x.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ^ ")?;
                    }
                    write!(f, "{}", l)?;
                }
                Ok(())
            }
        }
    }
}
