use std::collections::BTreeSet;
use crate::core::types::{CategoryKey, FeatureCombination};
use crate::index::keyed::KeyedCombinations;

/// Combinations seen at least once in the dump, per category.
///
/// Grows monotonically while a scan runs, so a partially filled index is
/// still a valid lower bound. Values are sets: only existence matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedIndex {
    inner: KeyedCombinations,
}

impl ObservedIndex {
    pub fn new() -> Self {
        ObservedIndex { inner: KeyedCombinations::new() }
    }

    /// Idempotent: re-inserting a known combination returns false.
    pub fn insert(&mut self, key: &CategoryKey, combination: FeatureCombination) -> bool {
        debug_assert!(!combination.is_empty());
        self.inner.insert(key, combination)
    }

    pub fn observed(&self, key: &CategoryKey) -> Option<&BTreeSet<FeatureCombination>> {
        self.inner.get(key)
    }

    pub fn contains(&self, key: &CategoryKey, combination: &FeatureCombination) -> bool {
        self.inner.contains(key, combination)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &BTreeSet<FeatureCombination>)> {
        self.inner.iter()
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

    /// Union with an index built from another shard. Commutative and
    /// associative, so shards can be merged in any grouping.
    pub fn merge(&mut self, other: ObservedIndex) {
        self.inner.merge(other.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FeatureId;

    fn combo(raw: &[&str]) -> FeatureCombination {
        raw.iter().map(|r| FeatureId(r.to_string())).collect()
    }

    #[test]
    fn merge_is_union_per_key() {
        let key = CategoryKey::new("Q188", "Q1084");
        let other_key = CategoryKey::new("Q150", "Q24905");

        let mut left = ObservedIndex::new();
        left.insert(&key, combo(&["Q1"]));
        left.insert(&key, combo(&["Q2"]));

        let mut right = ObservedIndex::new();
        right.insert(&key, combo(&["Q2"]));
        right.insert(&other_key, combo(&["Q3"]));

        let mut forward = left.clone();
        forward.merge(right.clone());
        let mut backward = right;
        backward.merge(left);

        assert_eq!(forward, backward);
        assert_eq!(forward.combination_count(), 3);
        assert_eq!(forward.len(), 2);
    }
}
