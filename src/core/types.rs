use serde::{Serialize, Deserialize};
use std::fmt;
use crate::core::ident::parse_item_id;

/// Upper bound on gap combinations requested by one generated query.
pub const DEFAULT_BATCH_CAP: usize = 6;

/// Grammatical feature id (a Wikidata item such as `Q110786`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    /// Returns `None` for ids outside the item namespace.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_item_id(raw).map(|id| FeatureId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language / part-of-speech bucket, e.g. (German, Noun)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryKey {
    pub language: LanguageId,
    pub category: CategoryId,
}

impl CategoryKey {
    pub fn new(language: &str, category: &str) -> Self {
        CategoryKey {
            language: LanguageId(language.to_string()),
            category: CategoryId(category.to_string()),
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.category)
    }
}

/// Set of feature ids identifying one inflected form signature.
///
/// Ids are kept sorted and unique, so equality, ordering and hashing follow
/// set identity. Presentation order comes from the position table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureCombination(Vec<FeatureId>);

impl FeatureCombination {
    pub fn new<I: IntoIterator<Item = FeatureId>>(ids: I) -> Self {
        let mut ids: Vec<FeatureId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        FeatureCombination(ids)
    }

    pub fn ids(&self) -> &[FeatureId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.0.binary_search(id).is_ok()
    }
}

impl FromIterator<FeatureId> for FeatureCombination {
    fn from_iter<I: IntoIterator<Item = FeatureId>>(iter: I) -> Self {
        FeatureCombination::new(iter)
    }
}

/// Observed but uncovered combination, features in presentation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub key: CategoryKey,
    pub features: Vec<FeatureId>,
}

impl GapEntry {
    pub fn first(&self) -> Option<&FeatureId> {
        self.features.first()
    }

    pub fn second(&self) -> Option<&FeatureId> {
        self.features.get(1)
    }

    pub fn combination(&self) -> FeatureCombination {
        self.features.iter().cloned().collect()
    }

    pub fn arity(&self) -> usize {
        self.features.len()
    }
}

/// Gap entries of one category destined for a single query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub key: CategoryKey,
    pub entries: Vec<GapEntry>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
