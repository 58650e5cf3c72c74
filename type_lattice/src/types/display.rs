//! Canonical rendering of types.
//!
//! The rendering is injective: `type_lattice_parser` reads it back to the
//! same type. Record and union labels are printed in sorted order.

use std::fmt;

use super::field::write_fields;
use super::{ArrayType, FunctionType, ObjectClass, ObjectType, RecordType, Type, UnionType};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Base(b) => write!(f, "{}", b),
            Type::Matrix(m) => write!(f, "{}", m),
            Type::Array(a) => write!(f, "{}", a),
            Type::Record(r) => write!(f, "{}", r),
            Type::Union(u) => write!(f, "{}", u),
            Type::Function(func) => write!(f, "{}", func),
            Type::Object(o) => write!(f, "{}", o),
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length() {
            Some(n) => write!(f, "arrayType({},{})", self.element(), n),
            None => write!(f, "{{{}}}", self.element()),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(f, self.fields(), "{", "}")
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(f, self.fields(), "{|", "|}")
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(function(")?;
        for (i, arg) in self.args().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "a{}:{}", i, arg)?;
        }
        write!(f, ") {})", self.return_type())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class() {
            ObjectClass::Unconstrained => f.write_str("object"),
            ObjectClass::Impossible => f.write_str("object()"),
            ObjectClass::Class(path) => write!(f, "object({})", path.join("/")),
        }
    }
}
