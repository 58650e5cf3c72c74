//! Flat (non-structured) type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar and special types that occupy a single node of the base lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseType {
    /// Bottom: no information yet.
    Unknown,
    Boolean,
    UnsignedByte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Complex,
    FixedPoint,
    /// Abstract supertype of the numeric scalars.
    Scalar,
    String,
    Event,
    XmlToken,
    Nil,
    /// Top: any value.
    General,
}

impl BaseType {
    pub const ALL: [BaseType; 16] = [
        BaseType::Unknown,
        BaseType::Boolean,
        BaseType::UnsignedByte,
        BaseType::Short,
        BaseType::Int,
        BaseType::Long,
        BaseType::Float,
        BaseType::Double,
        BaseType::Complex,
        BaseType::FixedPoint,
        BaseType::Scalar,
        BaseType::String,
        BaseType::Event,
        BaseType::XmlToken,
        BaseType::Nil,
        BaseType::General,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Unknown => "unknown",
            BaseType::Boolean => "boolean",
            BaseType::UnsignedByte => "unsignedByte",
            BaseType::Short => "short",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Complex => "complex",
            BaseType::FixedPoint => "fixedpoint",
            BaseType::Scalar => "scalar",
            BaseType::String => "string",
            BaseType::Event => "event",
            BaseType::XmlToken => "xmltoken",
            BaseType::Nil => "niltype",
            BaseType::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Abstract tags have no values of their own.
    pub fn is_instantiable(&self) -> bool {
        !matches!(
            self,
            BaseType::Unknown | BaseType::General | BaseType::Scalar
        )
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element kind of a matrix type. `Generic` is the abstract `matrix` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatrixKind {
    Boolean,
    Int,
    Long,
    Double,
    Complex,
    FixedPoint,
    Generic,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 7] = [
        MatrixKind::Boolean,
        MatrixKind::Int,
        MatrixKind::Long,
        MatrixKind::Double,
        MatrixKind::Complex,
        MatrixKind::FixedPoint,
        MatrixKind::Generic,
    ];

    /// The scalar each element has, `None` for the abstract `matrix`.
    pub fn element(&self) -> Option<BaseType> {
        match self {
            MatrixKind::Boolean => Some(BaseType::Boolean),
            MatrixKind::Int => Some(BaseType::Int),
            MatrixKind::Long => Some(BaseType::Long),
            MatrixKind::Double => Some(BaseType::Double),
            MatrixKind::Complex => Some(BaseType::Complex),
            MatrixKind::FixedPoint => Some(BaseType::FixedPoint),
            MatrixKind::Generic => None,
        }
    }

    /// Matrix kind holding elements of the named scalar, as written inside `[...]`.
    pub fn from_element_name(name: &str) -> Option<Self> {
        let base = BaseType::from_name(name)?;
        Self::ALL.into_iter().find(|k| k.element() == Some(base))
    }

    pub fn is_instantiable(&self) -> bool {
        *self != MatrixKind::Generic
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element() {
            Some(element) => write!(f, "[{}]", element),
            None => f.write_str("matrix"),
        }
    }
}

/// Structured type families. Each has one node in the base lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeShape {
    Array,
    Record,
    Union,
    Function,
    Object,
}

impl TypeShape {
    pub const ALL: [TypeShape; 5] = [
        TypeShape::Array,
        TypeShape::Record,
        TypeShape::Union,
        TypeShape::Function,
        TypeShape::Object,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TypeShape::Array => "array",
            TypeShape::Record => "record",
            TypeShape::Union => "union",
            TypeShape::Function => "function",
            TypeShape::Object => "object",
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
