// expr_creator.rs - boolean expression creator.
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
//! The module with arena of boolean expressions that contain cardinality,
//! pseudo-boolean and parity atoms.

use std::cell::RefCell;
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// Relation of pseudo-boolean atom.
///
/// `AtMostK` and `AtLeastK` are cardinality atoms - all coefficients are 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PbKind {
    /// At most k arguments are true.
    AtMostK,
    /// At least k arguments are true.
    AtLeastK,
    /// Weighted sum is less or equal to k.
    Le,
    /// Weighted sum is greater or equal to k.
    Ge,
    /// Weighted sum is equal to k.
    Eq,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    Value(bool),
    Variable(u32),
    Negated(usize),
    And(usize, usize),
    Or(usize, usize),
    Impl(usize, usize),
    Equal(usize, usize),
    Xor(Vec<usize>),
    Pb {
        kind: PbKind,
        args: Vec<usize>,
        coeffs: Vec<BigRational>,
        k: BigRational,
    },
}

impl Node {
    pub(crate) fn children(&self) -> Vec<usize> {
        match self {
            Node::Value(_) | Node::Variable(_) => vec![],
            Node::Negated(first) => vec![*first],
            Node::And(first, second)
            | Node::Or(first, second)
            | Node::Impl(first, second)
            | Node::Equal(first, second) => vec![*first, *second],
            Node::Xor(args) => args.clone(),
            Node::Pb { args, .. } => args.clone(),
        }
    }

    /// Returns true if node is an atom handled by internalizer.
    #[inline]
    pub(crate) fn is_atom(&self) -> bool {
        matches!(self, Node::Equal(_, _) | Node::Xor(_) | Node::Pb { .. })
    }
}

/// The arena of expression nodes. First two nodes are always false and true.
#[derive(Debug, PartialEq, Eq)]
pub struct ExprCreator {
    pub(crate) nodes: Vec<Node>,
    pub(crate) var_to_index: Vec<usize>,
}

macro_rules! new_xxx {
    ($t:ident, $u:ident) => {
        pub fn $t(&mut self, a_index: usize, b_index: usize) -> usize {
            assert!(a_index < self.nodes.len());
            assert!(b_index < self.nodes.len());
            self.nodes.push(Node::$u(a_index, b_index));
            self.nodes.len() - 1
        }
    };
}

impl ExprCreator {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(ExprCreator {
            nodes: vec![Node::Value(false), Node::Value(true)],
            var_to_index: vec![],
        }))
    }

    #[inline]
    pub fn var_count(&self) -> u32 {
        self.var_to_index.len() as u32
    }

    /// Creates new variable and returns index of its node.
    pub fn new_variable(&mut self) -> usize {
        self.nodes.push(Node::Variable(self.var_count()));
        self.var_to_index.push(self.nodes.len() - 1);
        self.nodes.len() - 1
    }

    /// Returns index of node of variable.
    pub fn variable(&self, var: u32) -> usize {
        self.var_to_index[var as usize]
    }

    #[inline]
    pub fn value(&self, v: bool) -> usize {
        usize::from(v)
    }

    pub fn new_not(&mut self, index: usize) -> usize {
        assert!(index < self.nodes.len());
        self.nodes.push(Node::Negated(index));
        self.nodes.len() - 1
    }

    new_xxx!(new_and, And);
    new_xxx!(new_or, Or);
    new_xxx!(new_equal, Equal);
    new_xxx!(new_impl, Impl);

    /// Creates n-ary xor of arguments.
    pub fn new_xor(&mut self, args: Vec<usize>) -> usize {
        assert!(args.iter().all(|x| *x < self.nodes.len()));
        self.nodes.push(Node::Xor(args));
        self.nodes.len() - 1
    }

    /// Creates pseudo-boolean atom. Number of coefficients must be equal to
    /// number of arguments.
    pub fn new_pb(
        &mut self,
        kind: PbKind,
        args: Vec<usize>,
        coeffs: Vec<BigRational>,
        k: BigRational,
    ) -> usize {
        assert!(args.iter().all(|x| *x < self.nodes.len()));
        assert_eq!(args.len(), coeffs.len());
        self.nodes.push(Node::Pb {
            kind,
            args,
            coeffs,
            k,
        });
        self.nodes.len() - 1
    }

    /// Creates cardinality atom (all coefficients are 1).
    pub fn new_card(&mut self, kind: PbKind, args: Vec<usize>, k: BigRational) -> usize {
        let coeffs = vec![BigRational::one(); args.len()];
        self.new_pb(kind, args, coeffs, k)
    }

    /// Evaluates expression for given values of variables.
    pub fn eval(&self, index: usize, values: &[bool]) -> bool {
        match &self.nodes[index] {
            Node::Value(v) => *v,
            Node::Variable(var) => values[*var as usize],
            Node::Negated(first) => !self.eval(*first, values),
            Node::And(first, second) => self.eval(*first, values) & self.eval(*second, values),
            Node::Or(first, second) => self.eval(*first, values) | self.eval(*second, values),
            Node::Impl(first, second) => !self.eval(*first, values) | self.eval(*second, values),
            Node::Equal(first, second) => {
                self.eval(*first, values) == self.eval(*second, values)
            }
            Node::Xor(args) => args
                .iter()
                .fold(false, |acc, arg| acc ^ self.eval(*arg, values)),
            Node::Pb {
                kind,
                args,
                coeffs,
                k,
            } => {
                let sum = args
                    .iter()
                    .zip(coeffs.iter())
                    .filter(|(arg, _)| self.eval(**arg, values))
                    .fold(BigRational::zero(), |acc, (_, c)| acc + c);
                match kind {
                    PbKind::AtMostK | PbKind::Le => sum <= *k,
                    PbKind::AtLeastK | PbKind::Ge => sum >= *k,
                    PbKind::Eq => sum == *k,
                }
            }
        }
    }
}

/// Converts integer to rational.
pub fn rational(t: impl Into<BigInt>) -> BigRational {
    BigRational::from_integer(t.into())
}
