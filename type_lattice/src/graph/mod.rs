//! Finite partial orders.
//!
//! A [`DirectedAcyclicGraph`] is assembled edge by edge and then frozen into a
//! [`FiniteCpo`], which answers order queries from a precomputed transitive
//! closure. An edge `a -> b` means `a < b`.
//!
//! The [`Cpo`] trait is shared with the structural type lattice, so generic
//! helpers (subset bounds, least/greatest element) work for both.

mod dag;

pub use dag::{DirectedAcyclicGraph, FiniteCpo};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of comparing two elements of a partial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CpoOrdering {
    Lower,
    Same,
    Higher,
    Incomparable,
}

impl CpoOrdering {
    /// The ordering seen from the other operand.
    pub fn reverse(self) -> Self {
        match self {
            CpoOrdering::Lower => CpoOrdering::Higher,
            CpoOrdering::Higher => CpoOrdering::Lower,
            other => other,
        }
    }

    /// `a <= b`
    pub fn is_at_most(self) -> bool {
        matches!(self, CpoOrdering::Lower | CpoOrdering::Same)
    }

    /// `a >= b`
    pub fn is_at_least(self) -> bool {
        matches!(self, CpoOrdering::Higher | CpoOrdering::Same)
    }

    pub fn is_comparable(self) -> bool {
        self != CpoOrdering::Incomparable
    }

    /// Combine two component orderings under the product order.
    ///
    /// ```
    /// use type_lattice::graph::CpoOrdering::*;
    ///
    /// assert_eq!(Same.combine(Lower), Lower);
    /// assert_eq!(Lower.combine(Lower), Lower);
    /// assert_eq!(Lower.combine(Higher), Incomparable);
    /// ```
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (CpoOrdering::Same, x) | (x, CpoOrdering::Same) => x,
            (x, y) if x == y => x,
            _ => CpoOrdering::Incomparable,
        }
    }
}

impl fmt::Display for CpoOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CpoOrdering::Lower => "LOWER",
            CpoOrdering::Same => "SAME",
            CpoOrdering::Higher => "HIGHER",
            CpoOrdering::Incomparable => "INCOMPARABLE",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("self loop on node {0}")]
    SelfLoop(String),
    #[error("graph contains a cycle through {0}")]
    Cyclic(String),
    #[error("node {0} is not in the graph")]
    UnknownNode(String),
}

/// A partially ordered set with (possibly partial) bound operations.
///
/// Bound operations return `None` when the bound does not exist. Lattices
/// always return `Some`.
pub trait Cpo {
    type Element: Clone + PartialEq;

    fn bottom(&self) -> Option<Self::Element>;

    fn top(&self) -> Option<Self::Element>;

    fn compare(&self, a: &Self::Element, b: &Self::Element) -> CpoOrdering;

    fn least_upper_bound(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element>;

    fn greatest_lower_bound(&self, a: &Self::Element, b: &Self::Element)
        -> Option<Self::Element>;

    /// Least upper bound of a subset. The empty subset has the bottom as its lub.
    fn least_upper_bound_of(&self, subset: &[Self::Element]) -> Option<Self::Element> {
        let mut iter = subset.iter();
        let Some(first) = iter.next() else {
            return self.bottom();
        };
        iter.try_fold(first.clone(), |acc, e| self.least_upper_bound(&acc, e))
    }

    /// Greatest lower bound of a subset. The empty subset has the top as its glb.
    fn greatest_lower_bound_of(&self, subset: &[Self::Element]) -> Option<Self::Element> {
        let mut iter = subset.iter();
        let Some(first) = iter.next() else {
            return self.top();
        };
        iter.try_fold(first.clone(), |acc, e| self.greatest_lower_bound(&acc, e))
    }

    /// The element of `subset` below every other element, if any.
    fn least_element(&self, subset: &[Self::Element]) -> Option<Self::Element> {
        subset
            .iter()
            .find(|c| subset.iter().all(|o| self.compare(c, o).is_at_most()))
            .cloned()
    }

    /// The element of `subset` above every other element, if any.
    fn greatest_element(&self, subset: &[Self::Element]) -> Option<Self::Element> {
        subset
            .iter()
            .find(|c| subset.iter().all(|o| self.compare(c, o).is_at_least()))
            .cloned()
    }
}
