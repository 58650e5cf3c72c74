//! Syntax tree for type expressions.
//!
//! The tree mirrors the canonical rendering one-to-one. Names are kept as
//! written; deciding whether `int` or `[fixedpoint]` is a real type is the
//! job of whoever lowers the tree.

use serde::{Deserialize, Serialize};

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExprKind {
    /// A bare name: `int`, `general`, `matrix`, ...
    Named(String),
    /// `[int]`
    Matrix(String),
    /// `{int}` (length `None`) or `arrayType(int,3)`
    Array {
        element: Box<TypeExpr>,
        length: Option<usize>,
    },
    /// `{x = int, y = double}`
    Record(Vec<FieldExpr>),
    /// `{|x = int, y = double|}`
    Union(Vec<FieldExpr>),
    /// `(function(a0:int, a1:int) boolean)`
    Function {
        args: Vec<FieldExpr>,
        ret: Box<TypeExpr>,
    },
    Object(ObjectExpr),
}

/// A labelled component: a record/union field or a named function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExpr {
    pub label: String,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectExpr {
    /// `object`
    Unconstrained,
    /// `object()`
    Impossible,
    /// `object(Actor/Source/Ramp)`, outermost ancestor first
    Class(Vec<String>),
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Number of nested type expressions below this one, counting itself.
    pub fn size(&self) -> usize {
        1 + match &self.kind {
            TypeExprKind::Named(_) | TypeExprKind::Matrix(_) | TypeExprKind::Object(_) => 0,
            TypeExprKind::Array { element, .. } => element.size(),
            TypeExprKind::Record(fields) | TypeExprKind::Union(fields) => {
                fields.iter().map(|f| f.ty.size()).sum()
            }
            TypeExprKind::Function { args, ret } => {
                args.iter().map(|a| a.ty.size()).sum::<usize>() + ret.size()
            }
        }
    }
}
