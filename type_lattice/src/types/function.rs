use serde::{Deserialize, Serialize};

use super::{FieldTerm, StructuredType, Type, TypeShape};
use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::TypeLattice;

/// Function type with positional arguments.
///
/// Two function types are only related when they take the same number of
/// arguments; then arguments and return type are compared pointwise (all
/// covariant). Bounds of different arities fall back to `unknown`/`general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    args: Vec<FieldTerm>,
    ret: Box<FieldTerm>,
}

impl FunctionType {
    pub fn new(args: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Self {
            args: args.into_iter().map(FieldTerm::new).collect(),
            ret: Box::new(FieldTerm::new(ret)),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> Option<&Type> {
        self.args.get(index).map(FieldTerm::resolved)
    }

    pub fn args(&self) -> impl Iterator<Item = &Type> {
        self.args.iter().map(FieldTerm::resolved)
    }

    pub fn return_type(&self) -> &Type {
        self.ret.resolved()
    }

    fn terms(&self) -> impl Iterator<Item = &FieldTerm> {
        self.args.iter().chain(std::iter::once(self.ret.as_ref()))
    }

    fn terms_mut(&mut self) -> impl Iterator<Item = &mut FieldTerm> {
        self.args.iter_mut().chain(std::iter::once(self.ret.as_mut()))
    }

    fn pointwise(&self, other: &Self, op: impl Fn(&Type, &Type) -> Type) -> Type {
        let args = self
            .args()
            .zip(other.args())
            .map(|(a, b)| op(a, b))
            .collect::<Vec<_>>();
        Type::Function(FunctionType::new(
            args,
            op(self.return_type(), other.return_type()),
        ))
    }
}

impl StructuredType for FunctionType {
    const SHAPE: TypeShape = TypeShape::Function;

    fn representative() -> Self {
        FunctionType::new(Vec::new(), Type::UNKNOWN)
    }

    fn compare_structure(&self, other: &Self, lattice: &TypeLattice) -> CpoOrdering {
        if self.arity() != other.arity() {
            return CpoOrdering::Incomparable;
        }
        let mut result = CpoOrdering::Same;
        for (a, b) in self.terms().zip(other.terms()) {
            result = result.combine(lattice.compare(a.resolved(), b.resolved()));
            if result == CpoOrdering::Incomparable {
                break;
            }
        }
        result
    }

    fn glb_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        if self.arity() != other.arity() {
            return Type::UNKNOWN;
        }
        self.pointwise(other, |a, b| lattice.glb(a, b))
    }

    fn lub_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        if self.arity() != other.arity() {
            return Type::GENERAL;
        }
        self.pointwise(other, |a, b| lattice.lub(a, b))
    }

    fn is_substitution_instance(&self, other: &Type) -> bool {
        let Type::Function(other) = other else {
            return false;
        };
        self.arity() == other.arity()
            && self
                .terms()
                .zip(other.terms())
                .all(|(d, o)| d.declared().is_substitution_instance(o.resolved()))
    }

    fn initialize(&mut self, ty: &Type) {
        for term in self.terms_mut() {
            term.initialize(ty);
        }
    }

    fn update_type(&mut self, new_type: &Self) -> TypeResult<()> {
        if self.arity() != new_type.arity() {
            return Err(TypeError::not_substitution_instance(self, new_type));
        }
        for (term, incoming) in self.terms_mut().zip(new_type.terms()) {
            term.set_value(incoming.resolved())?;
        }
        Ok(())
    }

    fn is_constant(&self) -> bool {
        self.terms().all(|t| t.declared().is_constant())
    }

    fn is_instantiable(&self) -> bool {
        self.terms().all(|t| t.resolved().is_instantiable())
    }

    fn depth(&self) -> usize {
        1 + self.terms().map(|t| t.resolved().depth()).max().unwrap_or(0)
    }
}
