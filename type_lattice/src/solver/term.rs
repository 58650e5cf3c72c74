use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::functions::MonotonicFunction;
use crate::types::Type;

/// Handle of a type variable inside a [`TypeVariables`](super::TypeVariables) store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Model element a type variable belongs to, e.g. `ramp.output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Owner {
    fn from(name: &str) -> Self {
        Owner::new(name)
    }
}

impl From<String> for Owner {
    fn from(name: String) -> Self {
        Owner(name)
    }
}

/// One side of an inequality.
#[derive(Clone)]
pub enum Term {
    /// A fixed type.
    Constant(Type),
    /// The current value of a type variable.
    Variable(VarId),
    /// A monotonic function of other terms, re-evaluated on every read.
    Function(Arc<dyn MonotonicFunction>),
}

impl Term {
    pub fn function(f: impl MonotonicFunction + 'static) -> Self {
        Term::Function(Arc::new(f))
    }

    pub fn as_variable(&self) -> Option<VarId> {
        match self {
            Term::Variable(id) => Some(*id),
            _ => None,
        }
    }

    /// Every variable the term reads, including through function arguments.
    pub fn variables(&self) -> Vec<VarId> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<VarId>) {
        match self {
            Term::Constant(_) => {}
            Term::Variable(id) => {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
            Term::Function(f) => {
                for arg in f.arguments() {
                    arg.collect_variables(out);
                }
            }
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(t) => f.debug_tuple("Constant").field(&t.to_string()).finish(),
            Term::Variable(id) => f.debug_tuple("Variable").field(id).finish(),
            Term::Function(func) => f
                .debug_struct("Function")
                .field("name", &func.name())
                .field("arguments", &func.arguments())
                .finish(),
        }
    }
}

impl From<Type> for Term {
    fn from(ty: Type) -> Self {
        Term::Constant(ty)
    }
}

impl From<VarId> for Term {
    fn from(id: VarId) -> Self {
        Term::Variable(id)
    }
}

/// `lesser <= greater`
#[derive(Debug, Clone)]
pub struct Inequality {
    pub lesser: Term,
    pub greater: Term,
}

impl Inequality {
    pub fn new(lesser: impl Into<Term>, greater: impl Into<Term>) -> Self {
        Self {
            lesser: lesser.into(),
            greater: greater.into(),
        }
    }

    pub fn variables(&self) -> Vec<VarId> {
        let mut vars = self.lesser.variables();
        for v in self.greater.variables() {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
        vars
    }
}
