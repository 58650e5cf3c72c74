//! Component slots of structured types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Type;
use crate::error::{TypeError, TypeResult};
use crate::graph::CpoOrdering;
use crate::lattice::TypeLattice;

/// A component of a structured type: the declared type fixed at construction
/// and the resolved type the solver refines.
///
/// A field whose declared type is constant is not settable and its resolved
/// type never changes. Equality and hashing only look at the resolved type,
/// so two fields are equal when they currently denote the same type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTerm {
    declared: Type,
    resolved: Type,
}

impl FieldTerm {
    pub fn new(declared: Type) -> Self {
        Self {
            resolved: declared.clone(),
            declared,
        }
    }

    pub fn declared(&self) -> &Type {
        &self.declared
    }

    pub fn resolved(&self) -> &Type {
        &self.resolved
    }

    pub fn is_settable(&self) -> bool {
        !self.declared.is_constant()
    }

    /// Reset the resolved type, putting `ty` at every settable leaf.
    pub fn initialize(&mut self, ty: &Type) {
        if !self.is_settable() {
            return;
        }
        if self.declared.is_unknown() {
            self.resolved = ty.clone();
        } else {
            self.resolved = self.declared.clone();
            self.resolved.initialize(ty);
        }
    }

    /// Replace the resolved type. `ty` must be a substitution instance of the
    /// declared type; a non-settable field only accepts its current value.
    pub fn set_value(&mut self, ty: &Type) -> TypeResult<()> {
        if !self.is_settable() {
            if self.resolved == *ty {
                return Ok(());
            }
            return Err(TypeError::ConstantType {
                ty: self.resolved.to_string(),
                candidate: ty.to_string(),
            });
        }
        if !self.declared.is_substitution_instance(ty) {
            return Err(TypeError::not_substitution_instance(&self.declared, ty));
        }
        if self.declared.is_unknown() {
            self.resolved = ty.clone();
            return Ok(());
        }
        let mut updated = self.declared.clone();
        updated.update_type(ty)?;
        self.resolved = updated;
        Ok(())
    }
}

impl PartialEq for FieldTerm {
    fn eq(&self, other: &Self) -> bool {
        self.resolved == other.resolved
    }
}

impl Eq for FieldTerm {}

impl Hash for FieldTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resolved.hash(state);
    }
}

impl From<Type> for FieldTerm {
    fn from(ty: Type) -> Self {
        FieldTerm::new(ty)
    }
}

// ==================== Labelled field maps ====================
//
// Shared by records and unions. The map is ordered by label, which gives the
// canonical rendering order for free.

pub(crate) type FieldMap = BTreeMap<String, FieldTerm>;

pub(crate) fn build_fields<L: Into<String>>(
    fields: impl IntoIterator<Item = (L, Type)>,
) -> TypeResult<FieldMap> {
    let mut map = FieldMap::new();
    for (label, ty) in fields {
        let label = label.into();
        if map.contains_key(&label) {
            return Err(TypeError::DuplicateLabel(label));
        }
        map.insert(label, FieldTerm::new(ty));
    }
    Ok(map)
}

/// Width ordering of two label sets: more labels is `Lower`.
pub(crate) fn width_order(a: &FieldMap, b: &FieldMap) -> CpoOrdering {
    let a_covers_b = b.keys().all(|l| a.contains_key(l));
    let b_covers_a = a.keys().all(|l| b.contains_key(l));
    match (a_covers_b, b_covers_a) {
        (true, true) => CpoOrdering::Same,
        (true, false) => CpoOrdering::Lower,
        (false, true) => CpoOrdering::Higher,
        (false, false) => CpoOrdering::Incomparable,
    }
}

/// Fold the orderings of shared fields into `width`.
pub(crate) fn compare_fields(
    a: &FieldMap,
    b: &FieldMap,
    width: CpoOrdering,
    lattice: &TypeLattice,
) -> CpoOrdering {
    let mut result = width;
    for (label, fa) in a {
        if result == CpoOrdering::Incomparable {
            break;
        }
        if let Some(fb) = b.get(label) {
            result = result.combine(lattice.compare(fa.resolved(), fb.resolved()));
        }
    }
    result
}

/// Combine shared fields with `op`. Unshared fields are kept when
/// `keep_unshared` is set and dropped otherwise.
pub(crate) fn merge_fields(
    a: &FieldMap,
    b: &FieldMap,
    keep_unshared: bool,
    op: impl Fn(&Type, &Type) -> Type,
) -> FieldMap {
    let mut merged = FieldMap::new();
    for (label, fa) in a {
        match b.get(label) {
            Some(fb) => {
                merged.insert(
                    label.clone(),
                    FieldTerm::new(op(fa.resolved(), fb.resolved())),
                );
            }
            None if keep_unshared => {
                merged.insert(label.clone(), FieldTerm::new(fa.resolved().clone()));
            }
            None => {}
        }
    }
    if keep_unshared {
        for (label, fb) in b {
            if !a.contains_key(label) {
                merged.insert(label.clone(), FieldTerm::new(fb.resolved().clone()));
            }
        }
    }
    merged
}

pub(crate) fn same_labels(a: &FieldMap, b: &FieldMap) -> bool {
    a.len() == b.len() && a.keys().zip(b.keys()).all(|(x, y)| x == y)
}

/// `other` fits the declared form of `declared` field by field.
pub(crate) fn fields_substitutable(declared: &FieldMap, other: &FieldMap) -> bool {
    same_labels(declared, other)
        && declared
            .values()
            .zip(other.values())
            .all(|(d, o)| d.declared().is_substitution_instance(o.resolved()))
}

/// Push the resolved types of `new` into `target`. Label sets must match.
pub(crate) fn update_fields(target: &mut FieldMap, new: &FieldMap) -> TypeResult<()> {
    debug_assert!(same_labels(target, new));
    for (field, incoming) in target.values_mut().zip(new.values()) {
        field.set_value(incoming.resolved())?;
    }
    Ok(())
}

pub(crate) fn write_fields(
    f: &mut fmt::Formatter<'_>,
    fields: &FieldMap,
    open: &str,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, (label, field)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} = {}", label, field.resolved())?;
    }
    f.write_str(close)
}
