//! Type values.
//!
//! A [`Type`] is either a flat tag that sits directly in the base lattice
//! (scalars, matrices, the special `unknown`/`general` types) or a structured
//! type built from component types:
//!
//! ```text
//! Type
//! ├── Base(BaseType)        int, double, string, unknown, general, ...
//! ├── Matrix(MatrixKind)    [int], [double], matrix, ...
//! ├── Array(ArrayType)      {int}, arrayType(double,3)
//! ├── Record(RecordType)    {x = double, y = int}
//! ├── Union(UnionType)      {|a = int, b = string|}
//! ├── Function(FunctionType) (function(a0:int) boolean)
//! └── Object(ObjectType)    object(Actor/Source)
//! ```
//!
//! Components of structured types are [`FieldTerm`]s. A component declared
//! with an abstract type (one that contains `unknown`) is settable, and the
//! solver refines it in place through [`Type::update_type`].
//!
//! Ordering, bounds and compatibility live in [`crate::lattice`].

mod array;
mod base;
mod display;
mod field;
mod function;
mod object;
mod parsing;
mod record;
mod union;

#[cfg(test)]
mod tests;

pub use array::ArrayType;
pub use base::{BaseType, MatrixKind, TypeShape};
pub use field::FieldTerm;
pub use function::FunctionType;
pub use object::{ObjectClass, ObjectType};
pub use record::RecordType;
pub use union::UnionType;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::{LatticeNode, TypeLattice};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Base(BaseType),
    Matrix(MatrixKind),
    Array(ArrayType),
    Record(RecordType),
    Union(UnionType),
    Function(FunctionType),
    Object(ObjectType),
}

/// Rules shared by every structured type family.
///
/// The lattice façade dispatches here when both operands belong to the same
/// family; `lattice` is passed in for comparing and bounding components.
pub trait StructuredType: Clone + PartialEq {
    const SHAPE: TypeShape;

    /// Canonical instance standing for the whole family in the base lattice.
    fn representative() -> Self;

    fn compare_structure(&self, other: &Self, lattice: &TypeLattice) -> CpoOrdering;

    fn glb_structure(&self, other: &Self, lattice: &TypeLattice) -> Type;

    fn lub_structure(&self, other: &Self, lattice: &TypeLattice) -> Type;

    /// Whether `other` can be obtained from this type's declared form by
    /// replacing settable components.
    fn is_substitution_instance(&self, other: &Type) -> bool;

    /// Put `ty` at every settable leaf.
    fn initialize(&mut self, ty: &Type);

    /// Copy the resolved components of `new_type` into the settable
    /// components of this type.
    fn update_type(&mut self, new_type: &Self) -> TypeResult<()>;

    fn is_constant(&self) -> bool;

    fn is_instantiable(&self) -> bool;

    fn depth(&self) -> usize;
}

impl Type {
    pub const UNKNOWN: Type = Type::Base(BaseType::Unknown);
    pub const GENERAL: Type = Type::Base(BaseType::General);

    pub const BOOLEAN: Type = Type::Base(BaseType::Boolean);
    pub const INT: Type = Type::Base(BaseType::Int);
    pub const LONG: Type = Type::Base(BaseType::Long);
    pub const DOUBLE: Type = Type::Base(BaseType::Double);
    pub const COMPLEX: Type = Type::Base(BaseType::Complex);
    pub const SCALAR: Type = Type::Base(BaseType::Scalar);
    pub const STRING: Type = Type::Base(BaseType::String);

    // ==================== Constructors ====================

    /// Array of unknown length.
    pub fn array(element: Type) -> Type {
        Type::Array(ArrayType::new(element))
    }

    pub fn array_of_length(element: Type, length: usize) -> Type {
        Type::Array(ArrayType::with_length(element, length))
    }

    pub fn record<L: Into<String>>(fields: impl IntoIterator<Item = (L, Type)>) -> TypeResult<Type> {
        RecordType::new(fields).map(Type::Record)
    }

    pub fn union<L: Into<String>>(fields: impl IntoIterator<Item = (L, Type)>) -> TypeResult<Type> {
        UnionType::new(fields).map(Type::Union)
    }

    pub fn function(args: impl IntoIterator<Item = Type>, ret: Type) -> Type {
        Type::Function(FunctionType::new(args, ret))
    }

    pub fn object<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Type {
        Type::Object(ObjectType::of_class(path))
    }

    pub fn matrix(kind: MatrixKind) -> Type {
        Type::Matrix(kind)
    }

    /// The type standing at a node of the base lattice.
    pub fn from_node(node: LatticeNode) -> Type {
        match node {
            LatticeNode::Base(b) => Type::Base(b),
            LatticeNode::Matrix(m) => Type::Matrix(m),
            LatticeNode::Shape(TypeShape::Array) => Type::Array(ArrayType::representative()),
            LatticeNode::Shape(TypeShape::Record) => Type::Record(RecordType::representative()),
            LatticeNode::Shape(TypeShape::Union) => Type::Union(UnionType::representative()),
            LatticeNode::Shape(TypeShape::Function) => {
                Type::Function(FunctionType::representative())
            }
            LatticeNode::Shape(TypeShape::Object) => Type::Object(ObjectType::representative()),
        }
    }

    // ==================== Classification ====================

    pub fn is_unknown(&self) -> bool {
        *self == Type::UNKNOWN
    }

    pub fn is_general(&self) -> bool {
        *self == Type::GENERAL
    }

    /// `unknown` or `general`.
    pub fn is_bound(&self) -> bool {
        self.is_unknown() || self.is_general()
    }

    pub fn shape(&self) -> Option<TypeShape> {
        match self {
            Type::Base(_) | Type::Matrix(_) => None,
            Type::Array(_) => Some(TypeShape::Array),
            Type::Record(_) => Some(TypeShape::Record),
            Type::Union(_) => Some(TypeShape::Union),
            Type::Function(_) => Some(TypeShape::Function),
            Type::Object(_) => Some(TypeShape::Object),
        }
    }

    pub fn is_structured(&self) -> bool {
        self.shape().is_some()
    }

    /// Node of the base lattice this type is ordered through when compared
    /// against a type of a different family.
    pub fn representative(&self) -> LatticeNode {
        match self {
            Type::Base(b) => LatticeNode::Base(*b),
            Type::Matrix(m) => LatticeNode::Matrix(*m),
            Type::Array(_) => LatticeNode::Shape(TypeShape::Array),
            Type::Record(_) => LatticeNode::Shape(TypeShape::Record),
            Type::Union(_) => LatticeNode::Shape(TypeShape::Union),
            Type::Function(_) => LatticeNode::Shape(TypeShape::Function),
            Type::Object(_) => LatticeNode::Shape(TypeShape::Object),
        }
    }

    /// A constant type contains no `unknown` component and cannot be refined.
    pub fn is_constant(&self) -> bool {
        match self {
            Type::Base(b) => *b != BaseType::Unknown,
            Type::Matrix(_) => true,
            Type::Array(a) => a.is_constant(),
            Type::Record(r) => r.is_constant(),
            Type::Union(u) => u.is_constant(),
            Type::Function(f) => f.is_constant(),
            Type::Object(o) => o.is_constant(),
        }
    }

    /// Whether values of this type can exist; abstract types are not.
    pub fn is_instantiable(&self) -> bool {
        match self {
            Type::Base(b) => b.is_instantiable(),
            Type::Matrix(m) => m.is_instantiable(),
            Type::Array(a) => a.is_instantiable(),
            Type::Record(r) => r.is_instantiable(),
            Type::Union(u) => u.is_instantiable(),
            Type::Function(f) => f.is_instantiable(),
            Type::Object(o) => o.is_instantiable(),
        }
    }

    /// Whether `other` can be obtained from this type by replacing its
    /// `unknown` components.
    ///
    /// ```
    /// use type_lattice::Type;
    ///
    /// let template = Type::record([("x", Type::UNKNOWN)]).unwrap();
    /// assert!(template.is_substitution_instance(&Type::record([("x", Type::INT)]).unwrap()));
    /// assert!(!template.is_substitution_instance(&Type::record([("y", Type::INT)]).unwrap()));
    /// ```
    pub fn is_substitution_instance(&self, other: &Type) -> bool {
        match self {
            Type::Base(BaseType::Unknown) => true,
            Type::Base(_) | Type::Matrix(_) => self == other,
            Type::Array(a) => a.is_substitution_instance(other),
            Type::Record(r) => r.is_substitution_instance(other),
            Type::Union(u) => u.is_substitution_instance(other),
            Type::Function(f) => f.is_substitution_instance(other),
            Type::Object(o) => o.is_substitution_instance(other),
        }
    }

    /// Put `ty` at every settable component. Flat types are unaffected.
    pub fn initialize(&mut self, ty: &Type) {
        match self {
            Type::Base(_) | Type::Matrix(_) => {}
            Type::Array(a) => a.initialize(ty),
            Type::Record(r) => r.initialize(ty),
            Type::Union(u) => u.initialize(ty),
            Type::Function(f) => f.initialize(ty),
            Type::Object(o) => o.initialize(ty),
        }
    }

    /// Refine this type in place to `new_type`.
    ///
    /// A constant type accepts only itself. A bare `unknown` becomes
    /// `new_type`. A structured type requires `new_type` to have the same
    /// family and declared form, and copies its components.
    pub fn update_type(&mut self, new_type: &Type) -> TypeResult<()> {
        if self.is_constant() {
            if self == new_type {
                return Ok(());
            }
            return Err(TypeError::ConstantType {
                ty: self.to_string(),
                candidate: new_type.to_string(),
            });
        }
        if self.is_unknown() {
            *self = new_type.clone();
            return Ok(());
        }
        match (self, new_type) {
            (Type::Array(a), Type::Array(b)) => a.update_type(b),
            (Type::Record(a), Type::Record(b)) => a.update_type(b),
            (Type::Union(a), Type::Union(b)) => a.update_type(b),
            (Type::Function(a), Type::Function(b)) => a.update_type(b),
            (this, _) => Err(TypeError::not_substitution_instance(this, new_type)),
        }
    }

    /// Nesting depth; flat types have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Type::Base(_) | Type::Matrix(_) => 1,
            Type::Array(a) => a.depth(),
            Type::Record(r) => r.depth(),
            Type::Union(u) => u.depth(),
            Type::Function(f) => f.depth(),
            Type::Object(o) => o.depth(),
        }
    }
}

impl From<BaseType> for Type {
    fn from(b: BaseType) -> Self {
        Type::Base(b)
    }
}

impl From<MatrixKind> for Type {
    fn from(m: MatrixKind) -> Self {
        Type::Matrix(m)
    }
}
