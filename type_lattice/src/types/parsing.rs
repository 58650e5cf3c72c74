//! Lowering of parsed type expressions into [`Type`] values.

use std::str::FromStr;

use type_lattice_parser::{FieldExpr, ObjectExpr, TypeExpr, TypeExprKind};

use super::{BaseType, MatrixKind, ObjectType, RecordType, Type, UnionType};
use crate::error::{TypeError, TypeResult};

impl Type {
    /// Build a type from a parsed expression.
    ///
    /// `matrix` is the abstract matrix type; every other bare name must be a
    /// base type. Function argument names are ignored.
    pub fn from_expr(expr: &TypeExpr) -> TypeResult<Type> {
        match &expr.kind {
            TypeExprKind::Named(name) if name == "matrix" => Ok(Type::Matrix(MatrixKind::Generic)),
            TypeExprKind::Named(name) => BaseType::from_name(name)
                .map(Type::Base)
                .ok_or_else(|| TypeError::UnknownTypeName(name.clone())),
            TypeExprKind::Matrix(element) => MatrixKind::from_element_name(element)
                .map(Type::Matrix)
                .ok_or_else(|| TypeError::UnknownTypeName(format!("[{}]", element))),
            TypeExprKind::Array { element, length } => {
                let element = Type::from_expr(element)?;
                Ok(match length {
                    Some(n) => Type::array_of_length(element, *n),
                    None => Type::array(element),
                })
            }
            TypeExprKind::Record(fields) => RecordType::new(lower_fields(fields)?).map(Type::Record),
            TypeExprKind::Union(fields) => UnionType::new(lower_fields(fields)?).map(Type::Union),
            TypeExprKind::Function { args, ret } => {
                let args = args
                    .iter()
                    .map(|a| Type::from_expr(&a.ty))
                    .collect::<TypeResult<Vec<_>>>()?;
                Ok(Type::function(args, Type::from_expr(ret)?))
            }
            TypeExprKind::Object(ObjectExpr::Unconstrained) => {
                Ok(Type::Object(ObjectType::unconstrained()))
            }
            TypeExprKind::Object(ObjectExpr::Impossible) => {
                Ok(Type::Object(ObjectType::impossible()))
            }
            TypeExprKind::Object(ObjectExpr::Class(path)) => Ok(Type::object(path.iter().cloned())),
        }
    }
}

fn lower_fields(fields: &[FieldExpr]) -> TypeResult<Vec<(String, Type)>> {
    fields
        .iter()
        .map(|f| Ok((f.label.clone(), Type::from_expr(&f.ty)?)))
        .collect()
}

impl FromStr for Type {
    type Err = TypeError;

    /// Parse the canonical rendering of a type.
    ///
    /// ```
    /// use type_lattice::Type;
    ///
    /// let ty: Type = "{x = double, y = {int}}".parse().unwrap();
    /// assert_eq!(ty.to_string(), "{x = double, y = {int}}");
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = type_lattice_parser::parse(s)?;
        Type::from_expr(&expr)
    }
}
