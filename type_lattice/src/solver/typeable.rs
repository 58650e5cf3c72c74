//! Model elements that carry a type.

use super::term::{Inequality, Owner, Term, VarId};
use super::variables::TypeVariables;
use crate::error::{TypeError, TypeResult};
use crate::types::Type;

/// Anything whose type takes part in resolution: ports, parameters,
/// expressions.
pub trait Typeable {
    /// The term standing for this element's type.
    fn type_term(&self) -> Term;

    /// Constraints this element places on its own type.
    fn type_constraints(&self) -> Vec<Inequality>;

    /// The current type of this element. Function terms have no stored
    /// value and are rejected.
    fn type_value(&self, vars: &TypeVariables) -> TypeResult<Type> {
        match self.type_term() {
            Term::Constant(ty) => Ok(ty),
            Term::Variable(id) => vars.value(id).cloned(),
            Term::Function(f) => Err(TypeError::MalformedOperand(format!(
                "{} has no stored type",
                f.name()
            ))),
        }
    }

    /// Whether the current type is acceptable. A fixed type is acceptable
    /// when it is instantiable.
    fn is_type_acceptable(&self, vars: &TypeVariables) -> TypeResult<bool> {
        match self.type_term() {
            Term::Variable(id) => vars.is_type_acceptable(id),
            _ => Ok(self.type_value(vars)?.is_instantiable()),
        }
    }
}

/// A model element backed by one type variable and the constraints
/// accumulated on it.
#[derive(Debug, Clone)]
pub struct TypedObject {
    var: VarId,
    constraints: Vec<Inequality>,
}

impl TypedObject {
    pub fn new(vars: &mut TypeVariables, owner: impl Into<Owner>, declared: Type) -> Self {
        Self {
            var: vars.add(owner, declared),
            constraints: Vec::new(),
        }
    }

    pub fn var(&self) -> VarId {
        self.var
    }

    /// `lower <= self`
    pub fn set_type_at_least(&mut self, lower: impl Into<Term>) {
        self.constraints.push(Inequality::new(lower, self.var));
    }

    /// `self <= upper`
    pub fn set_type_at_most(&mut self, upper: impl Into<Term>) {
        self.constraints.push(Inequality::new(self.var, upper));
    }

    /// Pin the type. A constant type makes the variable non-settable.
    pub fn set_type_equals(&self, vars: &mut TypeVariables, ty: Type) -> TypeResult<()> {
        vars.set_declared(self.var, ty)
    }

    /// Constrain this element to have the same type as `other`.
    pub fn set_type_same_as(&mut self, other: &dyn Typeable) {
        let term = other.type_term();
        self.constraints
            .push(Inequality::new(term.clone(), self.var));
        self.constraints.push(Inequality::new(self.var, term));
    }

    pub fn constraints(&self) -> &[Inequality] {
        &self.constraints
    }
}

impl Typeable for TypedObject {
    fn type_term(&self) -> Term {
        Term::Variable(self.var)
    }

    fn type_constraints(&self) -> Vec<Inequality> {
        self.constraints.clone()
    }
}

impl From<&TypedObject> for Term {
    fn from(object: &TypedObject) -> Self {
        object.type_term()
    }
}
