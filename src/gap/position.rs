use std::collections::HashMap;
use std::path::Path;
use serde::Deserialize;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{FeatureCombination, FeatureId};

/// Sort value for ids missing from the table; after every known id.
pub const UNKNOWN_POSITION: u32 = u32::MAX - 1;
/// Padding for short combinations; after everything, unknown ids included.
pub const PAD_POSITION: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMeta {
    pub id: FeatureId,
    pub label: String,
    pub category: String,
    pub rank: u32,
    pub position: u32,
}

/// Entry of the form metadata file
#[derive(Deserialize)]
struct RawMeta {
    label: String,
    qid: String,
}

/// Total order over known feature ids, grouped by category
/// (case before number, and so on). Only used for sorting.
#[derive(Debug, Clone, Default)]
pub struct FeaturePositionTable {
    features: HashMap<FeatureId, FeatureMeta>,
    categories: Vec<String>,
}

impl FeaturePositionTable {
    pub fn new() -> Self {
        FeaturePositionTable::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::source_io(path, e))?;
        Self::from_json_str(&text)
            .map_err(|e| Error::new(e.kind, format!("{}: {}", path.display(), e.context)))
    }

    /// Parse `{ "01_case": { "1": { "label": "Nominative", "qid": "Q131105" } } }`.
    /// Categories are ordered by name, entries by numeric rank.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, RawMeta>> = serde_json::from_str(text)?;

        let mut categories: Vec<(String, Vec<(u32, RawMeta)>)> = Vec::with_capacity(raw.len());
        for (category, entries) in raw {
            let mut ranked = Vec::with_capacity(entries.len());
            for (rank, meta) in entries {
                let rank = rank.trim().parse::<u32>().map_err(|_| {
                    Error::new(ErrorKind::Parse, format!("category {}: rank '{}' is not a number", category, rank))
                })?;
                ranked.push((rank, meta));
            }
            ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.qid.cmp(&b.1.qid)));
            categories.push((category, ranked));
        }
        categories.sort_by(|a, b| a.0.cmp(&b.0));

        let mut table = FeaturePositionTable::new();
        for (category, ranked) in categories {
            let entries = ranked
                .into_iter()
                .map(|(rank, meta)| (rank, meta.qid, meta.label))
                .collect::<Vec<_>>();
            table.push_category(&category, entries)?;
        }
        Ok(table)
    }

    /// Append a category after the ones already present.
    pub fn push_category(&mut self, category: &str, entries: Vec<(u32, String, String)>) -> Result<()> {
        self.categories.push(category.to_string());
        for (rank, qid, label) in entries {
            let id = FeatureId::parse(&qid).ok_or_else(|| {
                Error::new(ErrorKind::InvalidInput, format!("category {}: '{}' is not an item id", category, qid))
            })?;
            let position = self.features.len() as u32;
            // An id listed twice keeps its first position
            self.features.entry(id.clone()).or_insert(FeatureMeta {
                id,
                label,
                category: category.to_string(),
                rank,
                position,
            });
        }
        Ok(())
    }

    /// Build from labelled ids in order, all in one category. Handy for tests.
    pub fn from_ordered<'a, I>(category: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = FeaturePositionTable::new();
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(rank, (qid, label))| (rank as u32 + 1, qid.to_string(), label.to_string()))
            .collect();
        table.push_category(category, entries)?;
        Ok(table)
    }

    pub fn position(&self, id: &FeatureId) -> Option<u32> {
        self.features.get(id).map(|meta| meta.position)
    }

    pub fn meta(&self, id: &FeatureId) -> Option<&FeatureMeta> {
        self.features.get(id)
    }

    pub fn label(&self, id: &FeatureId) -> Option<&str> {
        self.features.get(id).map(|meta| meta.label.as_str())
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn sort_position(&self, id: &FeatureId) -> u32 {
        self.position(id).unwrap_or(UNKNOWN_POSITION)
    }

    /// Ids of a combination in table order; unknown ids last, by id.
    pub fn presentation_order(&self, combination: &FeatureCombination) -> Vec<FeatureId> {
        let mut ids = combination.ids().to_vec();
        ids.sort_by(|a, b| {
            self.sort_position(a)
                .cmp(&self.sort_position(b))
                .then_with(|| a.cmp(b))
        });
        ids
    }

    /// Positions of `ids` right-padded with [`PAD_POSITION`] to `width`.
    pub fn sort_key(&self, ids: &[FeatureId], width: usize) -> Vec<u32> {
        let mut key: Vec<u32> = ids.iter().map(|id| self.sort_position(id)).collect();
        if key.len() < width {
            key.resize(width, PAD_POSITION);
        }
        key
    }
}
