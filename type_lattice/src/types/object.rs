use serde::{Deserialize, Serialize};

use super::{StructuredType, Type, TypeShape};
use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::TypeLattice;

/// Where an object type sits in the class hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    /// Any object.
    Unconstrained,
    /// Instances of the last class in the path. The path lists ancestors
    /// outermost first, so `["Actor", "Source"]` is a subclass of `["Actor"]`.
    Class(Vec<String>),
    /// No object at all.
    Impossible,
}

/// Object references ordered by single inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectType {
    class: ObjectClass,
}

impl ObjectType {
    pub fn unconstrained() -> Self {
        Self {
            class: ObjectClass::Unconstrained,
        }
    }

    pub fn impossible() -> Self {
        Self {
            class: ObjectClass::Impossible,
        }
    }

    /// Object of the class at the end of `path`. An empty path means no class
    /// at all, which is the impossible object type.
    pub fn of_class<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Self::impossible();
        }
        Self {
            class: ObjectClass::Class(path),
        }
    }

    pub fn class(&self) -> &ObjectClass {
        &self.class
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.class {
            ObjectClass::Class(path) => path.last().map(String::as_str),
            _ => None,
        }
    }
}

fn is_ancestor(ancestor: &[String], path: &[String]) -> bool {
    path.len() >= ancestor.len() && path[..ancestor.len()] == *ancestor
}

impl StructuredType for ObjectType {
    const SHAPE: TypeShape = TypeShape::Object;

    fn representative() -> Self {
        ObjectType::unconstrained()
    }

    fn compare_structure(&self, other: &Self, _lattice: &TypeLattice) -> CpoOrdering {
        use ObjectClass::*;
        match (&self.class, &other.class) {
            (a, b) if a == b => CpoOrdering::Same,
            (Impossible, _) | (_, Unconstrained) => CpoOrdering::Lower,
            (_, Impossible) | (Unconstrained, _) => CpoOrdering::Higher,
            (Class(a), Class(b)) if is_ancestor(b, a) => CpoOrdering::Lower,
            (Class(a), Class(b)) if is_ancestor(a, b) => CpoOrdering::Higher,
            _ => CpoOrdering::Incomparable,
        }
    }

    fn glb_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        match self.compare_structure(other, lattice) {
            CpoOrdering::Lower | CpoOrdering::Same => Type::Object(self.clone()),
            CpoOrdering::Higher => Type::Object(other.clone()),
            CpoOrdering::Incomparable => Type::Object(ObjectType::impossible()),
        }
    }

    fn lub_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        match (&self.class, &other.class) {
            (ObjectClass::Class(a), ObjectClass::Class(b)) => {
                let common: Vec<String> = a
                    .iter()
                    .zip(b)
                    .take_while(|(x, y)| x == y)
                    .map(|(x, _)| x.clone())
                    .collect();
                if common.is_empty() {
                    Type::Object(ObjectType::unconstrained())
                } else {
                    Type::Object(ObjectType::of_class(common))
                }
            }
            _ => match self.compare_structure(other, lattice) {
                CpoOrdering::Higher | CpoOrdering::Same => Type::Object(self.clone()),
                _ => Type::Object(other.clone()),
            },
        }
    }

    fn is_substitution_instance(&self, other: &Type) -> bool {
        matches!(other, Type::Object(o) if o == self)
    }

    fn initialize(&mut self, _ty: &Type) {}

    fn update_type(&mut self, new_type: &Self) -> TypeResult<()> {
        if self == new_type {
            return Ok(());
        }
        Err(TypeError::ConstantType {
            ty: self.to_string(),
            candidate: new_type.to_string(),
        })
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn is_instantiable(&self) -> bool {
        self.class != ObjectClass::Impossible
    }

    fn depth(&self) -> usize {
        1
    }
}
