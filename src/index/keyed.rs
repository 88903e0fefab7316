use std::collections::{BTreeMap, BTreeSet};
use crate::core::types::{CategoryKey, FeatureCombination};

/// Sets of feature combinations per category key.
///
/// Both coverage and observation share this layout. BTree collections keep
/// iteration order stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedCombinations {
    pub sets: BTreeMap<CategoryKey, BTreeSet<FeatureCombination>>,
}

impl KeyedCombinations {
    pub fn new() -> Self {
        KeyedCombinations { sets: BTreeMap::new() }
    }

    /// Make the key known without adding a combination
    pub fn register_key(&mut self, key: CategoryKey) {
        self.sets.entry(key).or_default();
    }

    /// Returns true if the combination was not present before
    pub fn insert(&mut self, key: &CategoryKey, combination: FeatureCombination) -> bool {
        match self.sets.get_mut(key) {
            Some(set) => set.insert(combination),
            None => self.sets.entry(key.clone()).or_default().insert(combination),
        }
    }

    pub fn get(&self, key: &CategoryKey) -> Option<&BTreeSet<FeatureCombination>> {
        self.sets.get(key)
    }

    pub fn contains(&self, key: &CategoryKey, combination: &FeatureCombination) -> bool {
        self.sets.get(key).is_some_and(|set| set.contains(combination))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CategoryKey> {
        self.sets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &BTreeSet<FeatureCombination>)> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn combination_count(&self) -> usize {
        self.sets.values().map(BTreeSet::len).sum()
    }

    /// Set union per key
    pub fn merge(&mut self, other: KeyedCombinations) {
        for (key, combinations) in other.sets {
            match self.sets.get_mut(&key) {
                Some(set) => set.extend(combinations),
                None => {
                    self.sets.insert(key, combinations);
                }
            }
        }
    }
}
