use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{FieldTerm, StructuredType, Type, TypeShape};
use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::TypeLattice;

/// Homogeneous array with an optional statically known length.
///
/// Arrays are ordered by element type and length together: a known length is
/// more specific than an unknown one, and two different known lengths are
/// incomparable.
///
/// The declared length is kept apart from the current one so that an array
/// with unknown declared length can pick up a length during resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayType {
    element: Box<FieldTerm>,
    declared_length: Option<usize>,
    length: Option<usize>,
}

impl ArrayType {
    pub fn new(element: Type) -> Self {
        Self::from_parts(element, None)
    }

    pub fn with_length(element: Type, length: usize) -> Self {
        Self::from_parts(element, Some(length))
    }

    pub fn from_parts(element: Type, length: Option<usize>) -> Self {
        Self {
            element: Box::new(FieldTerm::new(element)),
            declared_length: length,
            length,
        }
    }

    pub fn element(&self) -> &Type {
        self.element.resolved()
    }

    pub fn declared_element(&self) -> &Type {
        self.element.declared()
    }

    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// Lengths `None` and `Some(1)` are the ones a lone scalar converts into.
    pub(crate) fn accepts_scalar(&self) -> bool {
        matches!(self.length, None | Some(1))
    }
}

impl PartialEq for ArrayType {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.element == other.element
    }
}

impl Eq for ArrayType {}

impl Hash for ArrayType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
        self.length.hash(state);
    }
}

fn length_order(a: Option<usize>, b: Option<usize>) -> CpoOrdering {
    match (a, b) {
        (Some(x), Some(y)) if x == y => CpoOrdering::Same,
        (Some(_), Some(_)) => CpoOrdering::Incomparable,
        (Some(_), None) => CpoOrdering::Lower,
        (None, Some(_)) => CpoOrdering::Higher,
        (None, None) => CpoOrdering::Same,
    }
}

impl StructuredType for ArrayType {
    const SHAPE: TypeShape = TypeShape::Array;

    fn representative() -> Self {
        ArrayType::new(Type::UNKNOWN)
    }

    fn compare_structure(&self, other: &Self, lattice: &TypeLattice) -> CpoOrdering {
        let lengths = length_order(self.length, other.length);
        if lengths == CpoOrdering::Incomparable {
            return lengths;
        }
        lengths.combine(lattice.compare(self.element(), other.element()))
    }

    fn glb_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        let length = match (self.length, other.length) {
            (Some(x), Some(y)) if x != y => return Type::UNKNOWN,
            (a, b) => a.or(b),
        };
        Type::Array(ArrayType::from_parts(
            lattice.glb(self.element(), other.element()),
            length,
        ))
    }

    fn lub_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        let length = if self.length == other.length {
            self.length
        } else {
            None
        };
        Type::Array(ArrayType::from_parts(
            lattice.lub(self.element(), other.element()),
            length,
        ))
    }

    fn is_substitution_instance(&self, other: &Type) -> bool {
        let Type::Array(other) = other else {
            return false;
        };
        (self.declared_length.is_none() || self.declared_length == other.length)
            && self
                .declared_element()
                .is_substitution_instance(other.element())
    }

    fn initialize(&mut self, ty: &Type) {
        self.element.initialize(ty);
        self.length = self.declared_length;
    }

    fn update_type(&mut self, new_type: &Self) -> TypeResult<()> {
        if self.declared_length.is_some() && self.declared_length != new_type.length {
            return Err(TypeError::not_substitution_instance(
                &Type::Array(self.clone()),
                &Type::Array(new_type.clone()),
            ));
        }
        self.element.set_value(new_type.element())?;
        self.length = new_type.length;
        Ok(())
    }

    fn is_constant(&self) -> bool {
        self.declared_element().is_constant()
    }

    fn is_instantiable(&self) -> bool {
        self.element().is_instantiable()
    }

    fn depth(&self) -> usize {
        1 + self.element().depth()
    }
}
