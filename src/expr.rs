// expr.rs - boolean expression structures.
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
//! The module with boolean expressions.
//!
//! The `ExprNode` is a handle to node in the `ExprCreator`. It provides operators
//! (`!`, `&`, `|`, `^`, `equal`, `imp`), constructors of cardinality and pseudo-boolean
//! atoms and classifiers used by internalizer to extract arguments,
//! coefficients and thresholds.
//!
//! Sample usage:
//!
//! ```
//! use cardgen::{BoolEqual, ExprCreator, ExprNode};
//! let ec = ExprCreator::new();
//! let x = ExprNode::variable(ec.clone());
//! let y = ExprNode::variable(ec.clone());
//! let z = ExprNode::variable(ec.clone());
//! let atom = ExprNode::at_least(ec.clone(), &[x.clone(), y.clone(), z], 2);
//! let f = atom.equal(x ^ y);
//! assert!(f.eval(&[true, false, true]));
//! ```

use std::cell::RefCell;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use crate::expr_creator::{rational, ExprCreator, Node, PbKind};

pub trait BoolEqual<Rhs = Self> {
    type Output;

    fn equal(self, rhs: Rhs) -> Self::Output;
}

impl BoolEqual for bool {
    type Output = bool;
    fn equal(self, rhs: bool) -> Self::Output {
        self == rhs
    }
}

pub trait BoolImpl<Rhs = Self> {
    type Output;

    fn imp(self, rhs: Rhs) -> Self::Output;
}

impl BoolImpl for bool {
    type Output = bool;
    fn imp(self, rhs: bool) -> Self::Output {
        (!self) | rhs
    }
}

/// Kind of atom handled by internalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomKind {
    /// Cardinality or pseudo-boolean atom.
    Pb(PbKind),
    /// Binary equivalence - head of chain of equivalences.
    Iff,
    /// N-ary xor.
    Xor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprNode {
    creator: Rc<RefCell<ExprCreator>>,
    index: usize,
}

impl ExprNode {
    /// Creates expression node from index of node. Index must be valid.
    pub fn new(creator: Rc<RefCell<ExprCreator>>, index: usize) -> Self {
        assert!(index < creator.borrow().nodes.len());
        ExprNode { creator, index }
    }

    pub fn value(creator: Rc<RefCell<ExprCreator>>, v: bool) -> Self {
        let index = creator.borrow().value(v);
        ExprNode { creator, index }
    }

    pub fn variable(creator: Rc<RefCell<ExprCreator>>) -> Self {
        let index = creator.borrow_mut().new_variable();
        ExprNode { creator, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn creator(&self) -> &Rc<RefCell<ExprCreator>> {
        &self.creator
    }

    pub(crate) fn node(&self) -> Node {
        self.creator.borrow().nodes[self.index].clone()
    }

    fn with_index(&self, index: usize) -> Self {
        ExprNode {
            creator: self.creator.clone(),
            index,
        }
    }

    fn new_atom(
        creator: Rc<RefCell<ExprCreator>>,
        kind: PbKind,
        terms: &[(BigRational, ExprNode)],
        k: BigRational,
    ) -> Self {
        let (coeffs, args): (Vec<_>, Vec<_>) = terms
            .iter()
            .map(|(c, x)| {
                assert_eq!(Rc::as_ptr(&creator), Rc::as_ptr(&x.creator));
                (c.clone(), x.index)
            })
            .unzip();
        let index = creator.borrow_mut().new_pb(kind, args, coeffs, k);
        ExprNode { creator, index }
    }

    fn unit_terms(args: &[ExprNode]) -> Vec<(BigRational, ExprNode)> {
        args.iter().map(|x| (BigRational::one(), x.clone())).collect()
    }

    /// Creates atom: at least k arguments are true.
    pub fn at_least(
        creator: Rc<RefCell<ExprCreator>>,
        args: &[ExprNode],
        k: impl Into<BigInt>,
    ) -> Self {
        Self::new_atom(creator, PbKind::AtLeastK, &Self::unit_terms(args), rational(k))
    }

    /// Creates atom: at most k arguments are true.
    pub fn at_most(
        creator: Rc<RefCell<ExprCreator>>,
        args: &[ExprNode],
        k: impl Into<BigInt>,
    ) -> Self {
        Self::new_atom(creator, PbKind::AtMostK, &Self::unit_terms(args), rational(k))
    }

    /// Creates atom: exactly k arguments are true.
    pub fn exactly(
        creator: Rc<RefCell<ExprCreator>>,
        args: &[ExprNode],
        k: impl Into<BigInt>,
    ) -> Self {
        Self::new_atom(creator, PbKind::Eq, &Self::unit_terms(args), rational(k))
    }

    /// Creates atom: weighted sum of true arguments is greater or equal to k.
    pub fn weighted_ge(
        creator: Rc<RefCell<ExprCreator>>,
        terms: &[(BigRational, ExprNode)],
        k: BigRational,
    ) -> Self {
        Self::new_atom(creator, PbKind::Ge, terms, k)
    }

    /// Creates atom: weighted sum of true arguments is less or equal to k.
    pub fn weighted_le(
        creator: Rc<RefCell<ExprCreator>>,
        terms: &[(BigRational, ExprNode)],
        k: BigRational,
    ) -> Self {
        Self::new_atom(creator, PbKind::Le, terms, k)
    }

    /// Creates atom: weighted sum of true arguments is equal to k.
    pub fn weighted_eq(
        creator: Rc<RefCell<ExprCreator>>,
        terms: &[(BigRational, ExprNode)],
        k: BigRational,
    ) -> Self {
        Self::new_atom(creator, PbKind::Eq, terms, k)
    }

    /// Creates n-ary xor of arguments: it is true if odd number of arguments are true.
    pub fn xor_all(creator: Rc<RefCell<ExprCreator>>, args: &[ExprNode]) -> Self {
        let args = args
            .iter()
            .map(|x| {
                assert_eq!(Rc::as_ptr(&creator), Rc::as_ptr(&x.creator));
                x.index
            })
            .collect();
        let index = creator.borrow_mut().new_xor(args);
        ExprNode { creator, index }
    }

    /// Evaluates expression for given values of variables.
    pub fn eval(&self, values: &[bool]) -> bool {
        self.creator.borrow().eval(self.index, values)
    }

    /// Returns kind of atom if expression is an atom handled by internalizer.
    pub fn atom_kind(&self) -> Option<AtomKind> {
        match self.creator.borrow().nodes[self.index] {
            Node::Pb { kind, .. } => Some(AtomKind::Pb(kind)),
            Node::Equal(_, _) => Some(AtomKind::Iff),
            Node::Xor(_) => Some(AtomKind::Xor),
            _ => None,
        }
    }

    /// Returns arguments of expression.
    pub fn args(&self) -> Vec<ExprNode> {
        let children = self.creator.borrow().nodes[self.index].children();
        children.into_iter().map(|i| self.with_index(i)).collect()
    }

    /// Returns coefficients of pseudo-boolean atom.
    pub fn coeffs(&self) -> Option<Vec<BigRational>> {
        if let Node::Pb { coeffs, .. } = &self.creator.borrow().nodes[self.index] {
            Some(coeffs.clone())
        } else {
            None
        }
    }

    /// Returns threshold of pseudo-boolean atom.
    pub fn threshold(&self) -> Option<BigRational> {
        if let Node::Pb { k, .. } = &self.creator.borrow().nodes[self.index] {
            Some(k.clone())
        } else {
            None
        }
    }

    /// Returns true if expression is pseudo-boolean atom with all coefficients equal to 1.
    pub fn has_unit_coefficients(&self) -> bool {
        if let Node::Pb { coeffs, .. } = &self.creator.borrow().nodes[self.index] {
            coeffs.iter().all(|c| c.is_one())
        } else {
            false
        }
    }

    /// Returns both sides if expression is an equivalence.
    pub fn as_iff(&self) -> Option<(ExprNode, ExprNode)> {
        if let Node::Equal(first, second) = self.creator.borrow().nodes[self.index] {
            Some((self.with_index(first), self.with_index(second)))
        } else {
            None
        }
    }

    /// Returns negated subexpression if expression is negation.
    pub fn as_negated(&self) -> Option<ExprNode> {
        if let Node::Negated(first) = self.creator.borrow().nodes[self.index] {
            Some(self.with_index(first))
        } else {
            None
        }
    }

    /// Returns value if expression is constant.
    pub fn as_value(&self) -> Option<bool> {
        if let Node::Value(v) = self.creator.borrow().nodes[self.index] {
            Some(v)
        } else {
            None
        }
    }

    /// Returns variable number if expression is variable.
    pub fn as_variable(&self) -> Option<u32> {
        if let Node::Variable(v) = self.creator.borrow().nodes[self.index] {
            Some(v)
        } else {
            None
        }
    }
}

impl Not for ExprNode {
    type Output = Self;

    fn not(self) -> Self::Output {
        let node1 = self.node();
        match node1 {
            Node::Value(v) => ExprNode::value(self.creator, !v),
            Node::Negated(index1) => ExprNode {
                creator: self.creator,
                index: index1,
            },
            _ => {
                let index = self.creator.borrow_mut().new_not(self.index);
                ExprNode {
                    creator: self.creator,
                    index,
                }
            }
        }
    }
}

macro_rules! new_op_impl {
    // for argeqres - if None then use self
    ($t:ident, $v:ident, $argeqres:expr, $values:expr, $mk:expr) => {
        impl $t for ExprNode {
            type Output = Self;

            fn $v(self, rhs: Self) -> Self::Output {
                assert_eq!(Rc::as_ptr(&self.creator), Rc::as_ptr(&rhs.creator));
                if self.index == rhs.index {
                    if let Some(t) = $argeqres {
                        return ExprNode::value(self.creator, t);
                    } else {
                        return self;
                    }
                }
                let (node1, node2) = (self.node(), rhs.node());
                if let (Node::Value(v1), Node::Value(v2)) = (&node1, &node2) {
                    return ExprNode::value(self.creator, $values(*v1, *v2));
                }
                let index = $mk(&mut *self.creator.borrow_mut(), self.index, rhs.index);
                ExprNode {
                    creator: self.creator,
                    index,
                }
            }
        }

        impl $t<bool> for ExprNode {
            type Output = Self;

            fn $v(self, rhs: bool) -> Self::Output {
                let rhs = ExprNode::value(self.creator.clone(), rhs);
                self.$v(rhs)
            }
        }
    };
}

new_op_impl!(
    BitAnd,
    bitand,
    None::<bool>,
    |a: bool, b: bool| a & b,
    |ec: &mut ExprCreator, a, b| ec.new_and(a, b)
);
new_op_impl!(
    BitOr,
    bitor,
    None::<bool>,
    |a: bool, b: bool| a | b,
    |ec: &mut ExprCreator, a, b| ec.new_or(a, b)
);
new_op_impl!(
    BitXor,
    bitxor,
    Some(false),
    |a: bool, b: bool| a ^ b,
    |ec: &mut ExprCreator, a, b| ec.new_xor(vec![a, b])
);
new_op_impl!(
    BoolEqual,
    equal,
    Some(true),
    |a: bool, b: bool| a == b,
    |ec: &mut ExprCreator, a, b| ec.new_equal(a, b)
);
new_op_impl!(
    BoolImpl,
    imp,
    Some(true),
    |a: bool, b: bool| !a | b,
    |ec: &mut ExprCreator, a, b| ec.new_impl(a, b)
);
