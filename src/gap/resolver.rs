use std::collections::BTreeMap;
use crate::core::types::{CategoryKey, FeatureCombination, GapEntry};
use crate::gap::position::FeaturePositionTable;
use crate::index::coverage::CoverageIndex;
use crate::index::observed::ObservedIndex;

/// Ordered gap entries per category; keys with an empty gap are absent.
pub type GapReport = BTreeMap<CategoryKey, Vec<GapEntry>>;

/// Computes observed minus covered and puts the result in canonical order
pub struct GapResolver<'a> {
    pub positions: &'a FeaturePositionTable,
}

impl<'a> GapResolver<'a> {
    pub fn new(positions: &'a FeaturePositionTable) -> Self {
        GapResolver { positions }
    }

    /// Categories only present in the coverage are ignored; categories
    /// never covered contribute everything they observed.
    pub fn resolve(&self, coverage: &CoverageIndex, observed: &ObservedIndex) -> GapReport {
        let mut report = GapReport::new();

        for (key, seen) in observed.iter() {
            let missing: Vec<&FeatureCombination> = match coverage.covered(key) {
                Some(covered) => seen.difference(covered).collect(),
                None => seen.iter().collect(),
            };
            if missing.is_empty() {
                continue;
            }

            let entries = self.order(key, missing);
            log::debug!("{}: {} uncovered combinations", key, entries.len());
            report.insert(key.clone(), entries);
        }

        report
    }

    /// Canonical order: arity ascending, then table positions compared
    /// element by element with unknown ids after known ones. Ties keep the
    /// incoming order.
    pub fn order(&self, key: &CategoryKey, combinations: Vec<&FeatureCombination>) -> Vec<GapEntry> {
        let width = combinations.iter().map(|c| c.len()).max().unwrap_or(0);

        let mut keyed: Vec<(usize, Vec<u32>, GapEntry)> = combinations
            .into_iter()
            .map(|combination| {
                let features = self.positions.presentation_order(combination);
                let sort_key = self.positions.sort_key(&features, width);
                let entry = GapEntry { key: key.clone(), features };
                (entry.arity(), sort_key, entry)
            })
            .collect();

        // Stable sort
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        keyed.into_iter().map(|(_, _, entry)| entry).collect()
    }
}
