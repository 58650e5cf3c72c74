//! The base lattice: flat types plus one node per structured family.
//!
//! Reading upwards from `unknown`:
//!
//! ```text
//! unsignedByte < short < int < long < scalar
//!                short < float < double < complex < scalar
//!                        int < double
//! fixedpoint < scalar < matrix < string < general
//! each scalar < its matrix, e.g. boolean < [boolean] < matrix
//! int < [int] < [long], [double] < [complex] < matrix
//! event, xmltoken, niltype < general
//! ```
//!
//! The full edge list is [`EDGES`]. Every structured family hangs directly
//! between `unknown` and `general`, so two structured types of different
//! families are incomparable.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::{Cpo, CpoOrdering, DirectedAcyclicGraph, FiniteCpo, GraphError};
use crate::types::{BaseType, MatrixKind, TypeShape};

/// A node of the base lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LatticeNode {
    Base(BaseType),
    Matrix(MatrixKind),
    /// Stand-in for every type of a structured family.
    Shape(TypeShape),
}

impl fmt::Display for LatticeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeNode::Base(b) => write!(f, "{}", b),
            LatticeNode::Matrix(m) => write!(f, "{}", m),
            LatticeNode::Shape(s) => write!(f, "<{}>", s),
        }
    }
}

use BaseType as B;
use LatticeNode::{Base, Matrix, Shape};
use MatrixKind as M;

/// Covering relation of the base lattice, `(lower, higher)`.
pub const EDGES: &[(LatticeNode, LatticeNode)] = &[
    // bottom
    (Base(B::Unknown), Base(B::Boolean)),
    (Base(B::Unknown), Base(B::UnsignedByte)),
    (Base(B::Unknown), Base(B::FixedPoint)),
    (Base(B::Unknown), Base(B::Event)),
    (Base(B::Unknown), Base(B::XmlToken)),
    (Base(B::Unknown), Base(B::Nil)),
    (Base(B::Unknown), Shape(TypeShape::Array)),
    (Base(B::Unknown), Shape(TypeShape::Record)),
    (Base(B::Unknown), Shape(TypeShape::Union)),
    (Base(B::Unknown), Shape(TypeShape::Function)),
    (Base(B::Unknown), Shape(TypeShape::Object)),
    // numeric widening
    (Base(B::UnsignedByte), Base(B::Short)),
    (Base(B::Short), Base(B::Int)),
    (Base(B::Short), Base(B::Float)),
    (Base(B::Int), Base(B::Long)),
    (Base(B::Int), Base(B::Double)),
    (Base(B::Float), Base(B::Double)),
    (Base(B::Long), Base(B::Scalar)),
    (Base(B::Double), Base(B::Complex)),
    (Base(B::Complex), Base(B::Scalar)),
    (Base(B::FixedPoint), Base(B::Scalar)),
    // scalars into their matrices
    (Base(B::Boolean), Matrix(M::Boolean)),
    (Base(B::Int), Matrix(M::Int)),
    (Base(B::Long), Matrix(M::Long)),
    (Base(B::Double), Matrix(M::Double)),
    (Base(B::Complex), Matrix(M::Complex)),
    (Base(B::FixedPoint), Matrix(M::FixedPoint)),
    // matrix widening
    (Matrix(M::Int), Matrix(M::Long)),
    (Matrix(M::Int), Matrix(M::Double)),
    (Matrix(M::Double), Matrix(M::Complex)),
    (Matrix(M::Boolean), Matrix(M::Generic)),
    (Matrix(M::Long), Matrix(M::Generic)),
    (Matrix(M::Complex), Matrix(M::Generic)),
    (Matrix(M::FixedPoint), Matrix(M::Generic)),
    (Base(B::Scalar), Matrix(M::Generic)),
    (Matrix(M::Generic), Base(B::String)),
    // top
    (Base(B::String), Base(B::General)),
    (Base(B::Event), Base(B::General)),
    (Base(B::XmlToken), Base(B::General)),
    (Base(B::Nil), Base(B::General)),
    (Shape(TypeShape::Array), Base(B::General)),
    (Shape(TypeShape::Record), Base(B::General)),
    (Shape(TypeShape::Union), Base(B::General)),
    (Shape(TypeShape::Function), Base(B::General)),
    (Shape(TypeShape::Object), Base(B::General)),
];

static BASE_LATTICE: Lazy<BaseLattice> = Lazy::new(|| {
    BaseLattice::from_edges(EDGES)
        .unwrap_or_else(|e| panic!("base type lattice is malformed: {}", e))
});

/// The fixed lattice of flat types and structured-family representatives.
#[derive(Debug)]
pub struct BaseLattice {
    cpo: FiniteCpo<LatticeNode>,
}

impl BaseLattice {
    /// Shared instance, built on first use.
    pub fn global() -> &'static BaseLattice {
        &BASE_LATTICE
    }

    /// Build a lattice from a covering relation.
    pub fn from_edges(edges: &[(LatticeNode, LatticeNode)]) -> Result<Self, GraphError> {
        let mut graph = DirectedAcyclicGraph::new();
        for (lower, higher) in edges {
            graph.add_node(*lower);
            graph.add_node(*higher);
        }
        for (lower, higher) in edges {
            graph.add_edge(lower, higher)?;
        }
        Ok(Self {
            cpo: graph.into_cpo()?,
        })
    }

    pub fn cpo(&self) -> &FiniteCpo<LatticeNode> {
        &self.cpo
    }

    pub fn compare(&self, a: LatticeNode, b: LatticeNode) -> CpoOrdering {
        self.cpo.compare(&a, &b)
    }

    /// Least upper bound; `general` when the nodes have no common bound.
    pub fn lub(&self, a: LatticeNode, b: LatticeNode) -> LatticeNode {
        self.cpo
            .least_upper_bound(&a, &b)
            .unwrap_or(Base(B::General))
    }

    /// Greatest lower bound; `unknown` when the nodes have no common bound.
    pub fn glb(&self, a: LatticeNode, b: LatticeNode) -> LatticeNode {
        self.cpo
            .greatest_lower_bound(&a, &b)
            .unwrap_or(Base(B::Unknown))
    }

    /// Topological position of a node. Lower nodes get lower ranks.
    pub fn rank(&self, node: LatticeNode) -> Option<usize> {
        self.cpo.rank(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(b: BaseType) -> LatticeNode {
        Base(b)
    }

    #[test]
    fn test_base_lattice_is_a_lattice() {
        let lattice = BaseLattice::global();
        assert_eq!(lattice.cpo().node_count(), 28);
        assert!(lattice.cpo().is_lattice());
        assert_eq!(lattice.cpo().bottom(), Some(base(B::Unknown)));
        assert_eq!(lattice.cpo().top(), Some(base(B::General)));
    }

    #[test]
    fn test_numeric_widening() {
        let lattice = BaseLattice::global();
        assert_eq!(
            lattice.compare(base(B::Int), base(B::Double)),
            CpoOrdering::Lower
        );
        assert_eq!(
            lattice.compare(base(B::Long), base(B::Double)),
            CpoOrdering::Incomparable
        );
        assert_eq!(lattice.lub(base(B::Long), base(B::Double)), base(B::Scalar));
        assert_eq!(lattice.glb(base(B::Long), base(B::Double)), base(B::Int));
        assert_eq!(lattice.lub(base(B::Float), base(B::Int)), base(B::Double));
        assert_eq!(lattice.glb(base(B::Float), base(B::Int)), base(B::Short));
        assert_eq!(lattice.lub(base(B::Int), base(B::FixedPoint)), base(B::Scalar));
        assert_eq!(lattice.glb(base(B::Int), base(B::FixedPoint)), base(B::Unknown));
    }

    #[test]
    fn test_matrices_and_strings() {
        let lattice = BaseLattice::global();
        assert_eq!(lattice.lub(base(B::Boolean), base(B::Int)), Matrix(M::Generic));
        assert_eq!(
            lattice.lub(Matrix(M::Long), Matrix(M::Complex)),
            Matrix(M::Generic)
        );
        assert_eq!(lattice.glb(Matrix(M::Long), Matrix(M::Complex)), Matrix(M::Int));
        assert_eq!(lattice.lub(Matrix(M::Int), base(B::Double)), Matrix(M::Double));
        assert_eq!(lattice.lub(base(B::Int), base(B::String)), base(B::String));
    }

    #[test]
    fn test_shapes_are_isolated() {
        let lattice = BaseLattice::global();
        let array = Shape(TypeShape::Array);
        let record = Shape(TypeShape::Record);
        assert_eq!(lattice.compare(array, record), CpoOrdering::Incomparable);
        assert_eq!(lattice.compare(array, base(B::String)), CpoOrdering::Incomparable);
        assert_eq!(lattice.lub(array, record), base(B::General));
        assert_eq!(lattice.glb(array, record), base(B::Unknown));
    }

    #[test]
    fn test_rank_respects_order() {
        let lattice = BaseLattice::global();
        let int = lattice.rank(base(B::Int)).unwrap();
        let double = lattice.rank(base(B::Double)).unwrap();
        assert!(int < double);
        assert_eq!(lattice.rank(base(B::Unknown)), Some(0));
    }

    #[test]
    fn test_cycle_in_edges_is_rejected() {
        let edges = [
            (base(B::Int), base(B::Double)),
            (base(B::Double), base(B::Int)),
        ];
        assert!(matches!(
            BaseLattice::from_edges(&edges),
            Err(GraphError::Cyclic(_))
        ));
    }
}
