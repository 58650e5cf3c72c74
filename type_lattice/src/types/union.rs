use serde::{Deserialize, Serialize};

use super::field::{self, FieldMap};
use super::{FieldTerm, StructuredType, Type, TypeShape};
use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::TypeLattice;

/// Tagged union: a value is exactly one of the labelled alternatives.
///
/// Width order is the reverse of records: fewer alternatives is more
/// specific.
///
/// ```text
/// {|x = int|} <= {|x = double, y = string|}
/// glb({|x = int|}, {|y = int|}) = {||}
/// lub({|x = int|}, {|y = int|}) = {|x = int, y = int|}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionType {
    fields: FieldMap,
}

impl UnionType {
    /// Build a union. Fails on a repeated label.
    pub fn new<L: Into<String>>(fields: impl IntoIterator<Item = (L, Type)>) -> TypeResult<Self> {
        Ok(Self {
            fields: field::build_fields(fields)?,
        })
    }

    /// The union with no alternatives, bottom of the union family.
    pub fn empty() -> Self {
        Self {
            fields: FieldMap::new(),
        }
    }

    /// Resolved type of an alternative.
    pub fn get(&self, label: &str) -> Option<&Type> {
        self.fields.get(label).map(FieldTerm::resolved)
    }

    pub fn field(&self, label: &str) -> Option<&FieldTerm> {
        self.fields.get(label)
    }

    /// Labels in canonical (sorted) order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.fields.iter().map(|(l, f)| (l.as_str(), f.resolved()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

impl StructuredType for UnionType {
    const SHAPE: TypeShape = TypeShape::Union;

    fn representative() -> Self {
        UnionType::empty()
    }

    fn compare_structure(&self, other: &Self, lattice: &TypeLattice) -> CpoOrdering {
        let width = field::width_order(&self.fields, &other.fields).reverse();
        field::compare_fields(&self.fields, &other.fields, width, lattice)
    }

    fn glb_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        Type::Union(UnionType {
            fields: field::merge_fields(&self.fields, &other.fields, false, |a, b| {
                lattice.glb(a, b)
            }),
        })
    }

    fn lub_structure(&self, other: &Self, lattice: &TypeLattice) -> Type {
        Type::Union(UnionType {
            fields: field::merge_fields(&self.fields, &other.fields, true, |a, b| {
                lattice.lub(a, b)
            }),
        })
    }

    fn is_substitution_instance(&self, other: &Type) -> bool {
        matches!(other, Type::Union(r) if field::fields_substitutable(&self.fields, &r.fields))
    }

    fn initialize(&mut self, ty: &Type) {
        for f in self.fields.values_mut() {
            f.initialize(ty);
        }
    }

    fn update_type(&mut self, new_type: &Self) -> TypeResult<()> {
        if !field::same_labels(&self.fields, &new_type.fields) {
            return Err(TypeError::not_substitution_instance(self, new_type));
        }
        field::update_fields(&mut self.fields, &new_type.fields)
    }

    fn is_constant(&self) -> bool {
        self.fields.values().all(|f| f.declared().is_constant())
    }

    fn is_instantiable(&self) -> bool {
        self.fields.values().all(|f| f.resolved().is_instantiable())
    }

    fn depth(&self) -> usize {
        1 + self
            .fields
            .values()
            .map(|f| f.resolved().depth())
            .max()
            .unwrap_or(0)
    }
}
