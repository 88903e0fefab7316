use crate::core::stats::ExtractStats;
use crate::core::types::{FeatureCombination, FeatureId};
use crate::dump::record::LexemeRecord;
use crate::index::observed::ObservedIndex;

/// Turns lexeme forms into feature combinations
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        FeatureExtractor
    }

    /// Build the combination of one form. Ids from foreign namespaces are
    /// dropped individually; the rest of the form survives.
    pub fn combination(&self, features: &[String], stats: &mut ExtractStats) -> Option<FeatureCombination> {
        let combination: FeatureCombination = features
            .iter()
            .filter_map(|raw| {
                let id = FeatureId::parse(raw);
                if id.is_none() {
                    stats.foreign_features += 1;
                }
                id
            })
            .collect();

        if combination.is_empty() {
            stats.featureless_forms += 1;
            return None;
        }
        Some(combination)
    }

    /// Add every form of the record to the index under the record's key.
    pub fn extract(&self, record: &LexemeRecord, observed: &mut ObservedIndex) -> ExtractStats {
        let mut stats = ExtractStats::default();
        if record.forms.is_empty() {
            return stats;
        }

        let key = record.key();
        for form in &record.forms {
            stats.forms += 1;
            if let Some(combination) = self.combination(&form.features, &mut stats) {
                if observed.insert(&key, combination) {
                    stats.inserted += 1;
                }
            }
        }
        stats
    }
}
