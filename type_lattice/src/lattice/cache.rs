//! Memoization of structural comparisons.
//!
//! Comparing nested structured types walks every component, and the solver
//! asks the same questions pass after pass. The cache maps a `(lhs, rhs)`
//! pair to its ordering. Entries keep the types themselves, so two types
//! with the same rendering but different structure can never collide.
//!
//! Lookups hash the borrowed pair once and scan a small bucket; the types
//! are cloned only when a new entry is recorded.
//!
//! The cache is append-only and safe to share between threads: type
//! ordering never changes, so a stale entry cannot exist.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dashmap::DashMap;

use crate::graph::CpoOrdering;
use crate::types::Type;

#[derive(Debug, Default)]
pub struct CompareCache {
    buckets: DashMap<u64, Vec<CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    lhs: Type,
    rhs: Type,
    ordering: CpoOrdering,
}

impl CacheEntry {
    fn matches(&self, lhs: &Type, rhs: &Type) -> bool {
        self.lhs == *lhs && self.rhs == *rhs
    }
}

fn pair_hash(lhs: &Type, rhs: &Type) -> u64 {
    let mut hasher = DefaultHasher::new();
    lhs.hash(&mut hasher);
    rhs.hash(&mut hasher);
    hasher.finish()
}

impl CompareCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, lhs: &Type, rhs: &Type) -> Option<CpoOrdering> {
        let bucket = self.buckets.get(&pair_hash(lhs, rhs))?;
        bucket
            .iter()
            .find(|entry| entry.matches(lhs, rhs))
            .map(|entry| entry.ordering)
    }

    /// Record `lhs ? rhs = ordering` together with the mirrored entry.
    pub fn insert(&self, lhs: &Type, rhs: &Type, ordering: CpoOrdering) {
        self.record(rhs, lhs, ordering.reverse());
        self.record(lhs, rhs, ordering);
    }

    // The bucket guard is released on return, before the mirrored insert
    // locks what may be the same shard.
    fn record(&self, lhs: &Type, rhs: &Type, ordering: CpoOrdering) {
        let mut bucket = self.buckets.entry(pair_hash(lhs, rhs)).or_default();
        match bucket.iter_mut().find(|entry| entry.matches(lhs, rhs)) {
            Some(entry) => entry.ordering = ordering,
            None => bucket.push(CacheEntry {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
                ordering,
            }),
        }
    }

    pub fn contains(&self, lhs: &Type, rhs: &Type) -> bool {
        self.get(lhs, rhs).is_some()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buckets.clear();
    }
}
