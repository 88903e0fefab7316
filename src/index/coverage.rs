use std::collections::BTreeSet;
use crate::core::types::{CategoryKey, FeatureCombination};
use crate::index::keyed::KeyedCombinations;

/// Combinations already retrieved by an existing query, per category.
///
/// Built once by the corpus miner and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageIndex {
    inner: KeyedCombinations,
}

impl CoverageIndex {
    pub fn new() -> Self {
        CoverageIndex { inner: KeyedCombinations::new() }
    }

    /// A tracked category may have no covered combination yet
    pub fn register_key(&mut self, key: CategoryKey) {
        self.inner.register_key(key);
    }

    pub fn insert(&mut self, key: &CategoryKey, combination: FeatureCombination) -> bool {
        self.inner.insert(key, combination)
    }

    pub fn covered(&self, key: &CategoryKey) -> Option<&BTreeSet<FeatureCombination>> {
        self.inner.get(key)
    }

    pub fn is_tracked(&self, key: &CategoryKey) -> bool {
        self.inner.get(key).is_some()
    }

    pub fn is_covered(&self, key: &CategoryKey, combination: &FeatureCombination) -> bool {
        self.inner.contains(key, combination)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CategoryKey> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn combination_count(&self) -> usize {
        self.inner.combination_count()
    }

    pub fn merge(&mut self, other: CoverageIndex) {
        self.inner.merge(other.inner);
    }
}
