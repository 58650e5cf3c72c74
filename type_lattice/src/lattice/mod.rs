//! The structural type lattice.
//!
//! [`TypeLattice`] orders every [`Type`]. It answers `compare`, `glb` and
//! `lub` for arbitrary pairs by picking one of four rules:
//!
//! 1. Equal types are `SAME`.
//! 2. Two types of the same structured family use that family's rules
//!    ([`StructuredType`]), recursing into components.
//! 3. A non-array type against an array uses scalar-to-array widening:
//!    `s <= {e}` when `s <= e` and the array length is unknown or 1.
//! 4. Everything else is ordered through the base lattice, where a structured
//!    type is represented by its family node.
//!
//! ```
//! use type_lattice::{graph::CpoOrdering, Type, TypeLattice};
//!
//! let lattice = TypeLattice::new();
//! let narrow: Type = "{x = int, y = double}".parse().unwrap();
//! let wide: Type = "{x = double}".parse().unwrap();
//! assert_eq!(lattice.compare(&narrow, &wide), CpoOrdering::Lower);
//! assert_eq!(lattice.compare(&Type::SCALAR, &Type::array(Type::SCALAR)), CpoOrdering::Lower);
//! ```

mod base;
mod cache;

pub use base::{BaseLattice, LatticeNode, EDGES};
pub use cache::CompareCache;

use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::graph::{Cpo, CpoOrdering};
use crate::types::{ArrayType, StructuredType, Type};

/// Façade over the base lattice and the structured-type rules.
///
/// Cloning is cheap; clones share the comparison cache.
#[derive(Debug, Clone)]
pub struct TypeLattice {
    base: &'static BaseLattice,
    cache: Option<Arc<CompareCache>>,
}

impl Default for TypeLattice {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeLattice {
    /// A lattice with a fresh comparison cache.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(CompareCache::new()))
    }

    pub fn uncached() -> Self {
        Self {
            base: BaseLattice::global(),
            cache: None,
        }
    }

    /// A lattice sharing an existing cache.
    pub fn with_cache(cache: Arc<CompareCache>) -> Self {
        Self {
            base: BaseLattice::global(),
            cache: Some(cache),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        if config.cache_comparisons {
            Self::new()
        } else {
            Self::uncached()
        }
    }

    pub fn cache(&self) -> Option<&Arc<CompareCache>> {
        self.cache.as_ref()
    }

    pub fn base(&self) -> &'static BaseLattice {
        self.base
    }

    pub fn bottom(&self) -> Type {
        Type::UNKNOWN
    }

    pub fn top(&self) -> Type {
        Type::GENERAL
    }

    // ==================== Ordering ====================

    pub fn compare(&self, a: &Type, b: &Type) -> CpoOrdering {
        if a == b {
            return CpoOrdering::Same;
        }
        if !a.is_structured() && !b.is_structured() {
            return self.base.compare(a.representative(), b.representative());
        }
        let Some(cache) = &self.cache else {
            return self.compare_structured(a, b);
        };
        if let Some(hit) = cache.get(a, b) {
            return hit;
        }
        let result = self.compare_structured(a, b);
        cache.insert(a, b, result);
        result
    }

    fn compare_structured(&self, a: &Type, b: &Type) -> CpoOrdering {
        match (a, b) {
            (Type::Array(x), Type::Array(y)) => x.compare_structure(y, self),
            (Type::Record(x), Type::Record(y)) => x.compare_structure(y, self),
            (Type::Union(x), Type::Union(y)) => x.compare_structure(y, self),
            (Type::Function(x), Type::Function(y)) => x.compare_structure(y, self),
            (Type::Object(x), Type::Object(y)) => x.compare_structure(y, self),
            (_, Type::Array(array)) if !a.is_bound() => self.compare_with_array(a, array),
            (Type::Array(array), _) if !b.is_bound() => {
                self.compare_with_array(b, array).reverse()
            }
            _ => self.base.compare(a.representative(), b.representative()),
        }
    }

    /// Order of a non-array type against an array. An array is never below a
    /// non-array other than `general`.
    fn compare_with_array(&self, scalar: &Type, array: &ArrayType) -> CpoOrdering {
        if array.accepts_scalar() && self.compare(scalar, array.element()).is_at_most() {
            CpoOrdering::Lower
        } else {
            CpoOrdering::Incomparable
        }
    }

    /// `source` converts losslessly into `target`.
    pub fn is_compatible(&self, target: &Type, source: &Type) -> bool {
        self.compare(source, target).is_at_most()
    }

    // ==================== Bounds ====================

    pub fn glb(&self, a: &Type, b: &Type) -> Type {
        match self.compare(a, b) {
            CpoOrdering::Lower | CpoOrdering::Same => return a.clone(),
            CpoOrdering::Higher => return b.clone(),
            CpoOrdering::Incomparable => {}
        }
        match (a, b) {
            (Type::Array(x), Type::Array(y)) => x.glb_structure(y, self),
            (Type::Record(x), Type::Record(y)) => x.glb_structure(y, self),
            (Type::Union(x), Type::Union(y)) => x.glb_structure(y, self),
            (Type::Function(x), Type::Function(y)) => x.glb_structure(y, self),
            (Type::Object(x), Type::Object(y)) => x.glb_structure(y, self),
            (_, Type::Array(array)) => self.glb_with_array(a, array),
            (Type::Array(array), _) => self.glb_with_array(b, array),
            _ => Type::from_node(self.base.glb(a.representative(), b.representative())),
        }
    }

    pub fn lub(&self, a: &Type, b: &Type) -> Type {
        match self.compare(a, b) {
            CpoOrdering::Lower | CpoOrdering::Same => return b.clone(),
            CpoOrdering::Higher => return a.clone(),
            CpoOrdering::Incomparable => {}
        }
        match (a, b) {
            (Type::Array(x), Type::Array(y)) => x.lub_structure(y, self),
            (Type::Record(x), Type::Record(y)) => x.lub_structure(y, self),
            (Type::Union(x), Type::Union(y)) => x.lub_structure(y, self),
            (Type::Function(x), Type::Function(y)) => x.lub_structure(y, self),
            (Type::Object(x), Type::Object(y)) => x.lub_structure(y, self),
            (_, Type::Array(array)) => self.lub_with_array(a, array),
            (Type::Array(array), _) => self.lub_with_array(b, array),
            _ => Type::from_node(self.base.lub(a.representative(), b.representative())),
        }
    }

    // Both helpers are only reached for incomparable pairs, so `scalar` is
    // neither `unknown` nor `general`.

    fn glb_with_array(&self, scalar: &Type, array: &ArrayType) -> Type {
        if array.accepts_scalar() {
            self.glb(scalar, array.element())
        } else {
            Type::UNKNOWN
        }
    }

    fn lub_with_array(&self, scalar: &Type, array: &ArrayType) -> Type {
        let length = if array.length() == Some(1) { Some(1) } else { None };
        Type::Array(ArrayType::from_parts(
            self.lub(scalar, array.element()),
            length,
        ))
    }

    /// Least upper bound of any number of types; `unknown` for none.
    pub fn lub_all<'a>(&self, types: impl IntoIterator<Item = &'a Type>) -> Type {
        types
            .into_iter()
            .fold(Type::UNKNOWN, |acc, t| self.lub(&acc, t))
    }

    /// Greatest lower bound of any number of types; `general` for none.
    pub fn glb_all<'a>(&self, types: impl IntoIterator<Item = &'a Type>) -> Type {
        types
            .into_iter()
            .fold(Type::GENERAL, |acc, t| self.glb(&acc, t))
    }
}

impl Cpo for TypeLattice {
    type Element = Type;

    fn bottom(&self) -> Option<Type> {
        Some(Type::UNKNOWN)
    }

    fn top(&self) -> Option<Type> {
        Some(Type::GENERAL)
    }

    fn compare(&self, a: &Type, b: &Type) -> CpoOrdering {
        TypeLattice::compare(self, a, b)
    }

    fn least_upper_bound(&self, a: &Type, b: &Type) -> Option<Type> {
        Some(self.lub(a, b))
    }

    fn greatest_lower_bound(&self, a: &Type, b: &Type) -> Option<Type> {
        Some(self.glb(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordType;

    fn ty(s: &str) -> Type {
        s.parse().unwrap_or_else(|e| panic!("bad type {:?}: {}", s, e))
    }

    #[test]
    fn test_identity_is_same() {
        let lattice = TypeLattice::new();
        let t = ty("{a = {int}, b = (function(a0:int) double)}");
        assert_eq!(lattice.compare(&t, &t.clone()), CpoOrdering::Same);
    }

    #[test]
    fn test_base_pairs_match_base_lattice() {
        let lattice = TypeLattice::uncached();
        assert_eq!(lattice.compare(&Type::INT, &Type::DOUBLE), CpoOrdering::Lower);
        assert_eq!(lattice.lub(&Type::LONG, &Type::DOUBLE), Type::SCALAR);
        assert_eq!(lattice.glb(&Type::LONG, &Type::DOUBLE), Type::INT);
        assert_eq!(lattice.lub(&Type::BOOLEAN, &Type::INT), ty("matrix"));
    }

    #[test]
    fn test_record_width_subtyping() {
        let lattice = TypeLattice::new();
        let a = ty("{x = int, y = double}");
        let b = ty("{x = double}");
        assert_eq!(lattice.compare(&a, &b), CpoOrdering::Lower);
        assert_eq!(lattice.compare(&b, &a), CpoOrdering::Higher);
        assert_eq!(lattice.glb(&ty("{x = int}"), &ty("{y = int}")), ty("{x = int, y = int}"));
        assert_eq!(
            lattice.lub(&ty("{x = int}"), &ty("{y = int}")),
            Type::Record(RecordType::empty())
        );
        assert_eq!(
            lattice.lub(&ty("{x = int, y = string}"), &ty("{x = double, z = int}")),
            ty("{x = double}")
        );
    }

    #[test]
    fn test_union_width_is_reversed() {
        let lattice = TypeLattice::new();
        assert_eq!(
            lattice.compare(&ty("{|x = int|}"), &ty("{|x = double, y = string|}")),
            CpoOrdering::Lower
        );
        assert_eq!(
            lattice.lub(&ty("{|x = int|}"), &ty("{|y = int|}")),
            ty("{|x = int, y = int|}")
        );
        assert_eq!(lattice.glb(&ty("{|x = int|}"), &ty("{|y = int|}")), ty("{||}"));
    }

    #[test]
    fn test_array_order_and_lengths() {
        let lattice = TypeLattice::new();
        assert_eq!(
            lattice.compare(&ty("arrayType(int,3)"), &ty("{double}")),
            CpoOrdering::Lower
        );
        assert_eq!(
            lattice.compare(&ty("arrayType(int,3)"), &ty("arrayType(int,2)")),
            CpoOrdering::Incomparable
        );
        assert_eq!(
            lattice.lub(&ty("arrayType(int,3)"), &ty("arrayType(double,2)")),
            ty("{double}")
        );
        assert_eq!(
            lattice.glb(&ty("arrayType(int,3)"), &ty("arrayType(double,2)")),
            Type::UNKNOWN
        );
        assert_eq!(
            lattice.glb(&ty("arrayType(long,3)"), &ty("{double}")),
            ty("arrayType(int,3)")
        );
    }

    #[test]
    fn test_scalar_to_array_widening() {
        let lattice = TypeLattice::new();
        assert_eq!(lattice.compare(&Type::INT, &ty("{double}")), CpoOrdering::Lower);
        assert_eq!(lattice.compare(&ty("{double}"), &Type::INT), CpoOrdering::Higher);
        assert_eq!(lattice.compare(&Type::INT, &ty("arrayType(double,1)")), CpoOrdering::Lower);
        assert_eq!(
            lattice.compare(&Type::INT, &ty("arrayType(double,2)")),
            CpoOrdering::Incomparable
        );
        assert_eq!(lattice.compare(&Type::STRING, &ty("{int}")), CpoOrdering::Incomparable);
        assert_eq!(lattice.lub(&Type::STRING, &ty("{int}")), ty("{string}"));
        assert_eq!(
            lattice.lub(&Type::BOOLEAN, &ty("arrayType(int,1)")),
            ty("arrayType(matrix,1)")
        );
        assert_eq!(lattice.glb(&Type::STRING, &ty("{int}")), Type::INT);
        assert_eq!(lattice.glb(&Type::STRING, &ty("arrayType(int,4)")), Type::UNKNOWN);
    }

    #[test]
    fn test_bounds_of_unknown_and_general() {
        let lattice = TypeLattice::new();
        let arr = ty("{int}");
        assert_eq!(lattice.compare(&Type::UNKNOWN, &arr), CpoOrdering::Lower);
        assert_eq!(lattice.compare(&arr, &Type::GENERAL), CpoOrdering::Lower);
        assert_eq!(lattice.lub(&Type::UNKNOWN, &arr), arr);
        assert_eq!(lattice.glb(&Type::GENERAL, &arr), arr);
    }

    #[test]
    fn test_cross_family_is_incomparable() {
        let lattice = TypeLattice::new();
        let record = ty("{x = int}");
        let union = ty("{|x = int|}");
        assert_eq!(lattice.compare(&record, &union), CpoOrdering::Incomparable);
        assert_eq!(lattice.compare(&record, &Type::STRING), CpoOrdering::Incomparable);
        assert_eq!(lattice.lub(&record, &union), Type::GENERAL);
        assert_eq!(lattice.glb(&record, &union), Type::UNKNOWN);
    }

    #[test]
    fn test_function_arity() {
        let lattice = TypeLattice::new();
        let f1 = ty("(function(a0:int) boolean)");
        let f2 = ty("(function(a0:int, a1:int) boolean)");
        let f3 = ty("(function(a0:double) boolean)");
        assert_eq!(lattice.compare(&f1, &f2), CpoOrdering::Incomparable);
        assert_eq!(lattice.compare(&f1, &f3), CpoOrdering::Lower);
        assert_eq!(lattice.lub(&f1, &f2), Type::GENERAL);
        assert_eq!(lattice.glb(&f1, &f2), Type::UNKNOWN);
        assert_eq!(
            lattice.lub(&f1, &ty("(function(a0:long) int)")),
            ty("(function(a0:long) matrix)")
        );
    }

    #[test]
    fn test_objects_follow_class_path() {
        let lattice = TypeLattice::new();
        let ramp = ty("object(Actor/Source/Ramp)");
        let source = ty("object(Actor/Source)");
        let sink = ty("object(Actor/Sink)");
        assert_eq!(lattice.compare(&ramp, &source), CpoOrdering::Lower);
        assert_eq!(lattice.compare(&source, &sink), CpoOrdering::Incomparable);
        assert_eq!(lattice.lub(&ramp, &sink), ty("object(Actor)"));
        assert_eq!(lattice.glb(&ramp, &sink), ty("object()"));
        assert_eq!(lattice.compare(&ty("object()"), &ty("object")), CpoOrdering::Lower);
    }

    #[test]
    fn test_cache_is_populated_for_structured_pairs() {
        let lattice = TypeLattice::new();
        lattice.compare(&Type::INT, &Type::DOUBLE);
        assert!(lattice.cache().unwrap().is_empty());
        let a = ty("{x = int}");
        let b = ty("{x = double}");
        lattice.compare(&a, &b);
        assert!(lattice.cache().unwrap().contains(&a, &b));
        assert_eq!(lattice.cache().unwrap().get(&b, &a), Some(CpoOrdering::Higher));
    }

    #[test]
    fn test_subset_bounds() {
        let lattice = TypeLattice::new();
        let types = [Type::INT, ty("{long}"), Type::DOUBLE];
        assert_eq!(lattice.lub_all(&types), ty("{scalar}"));
        assert_eq!(lattice.glb_all(&types), Type::INT);
        assert_eq!(lattice.lub_all(&[]), Type::UNKNOWN);
        assert_eq!(Cpo::least_upper_bound_of(&lattice, &[]), Some(Type::UNKNOWN));
        assert_eq!(Cpo::least_element(&lattice, &types), Some(Type::INT));
        assert_eq!(Cpo::greatest_element(&lattice, &types), None);
    }

    #[test]
    fn test_is_compatible() {
        let lattice = TypeLattice::new();
        assert!(lattice.is_compatible(&Type::DOUBLE, &Type::INT));
        assert!(!lattice.is_compatible(&Type::INT, &Type::DOUBLE));
        assert!(lattice.is_compatible(&ty("{double}"), &Type::INT));
    }
}
