use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use serde::de::IgnoredAny;
use crate::core::types::{CategoryKey, CategoryId, LanguageId};
use crate::dump::scanner::ScanFilter;

/// One lexeme from the dump. Transient: consumed by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexemeRecord {
    pub entry_id: String,
    pub language: LanguageId,
    pub category: CategoryId,
    pub forms: Vec<FormRecord>,
}

impl LexemeRecord {
    pub fn key(&self) -> CategoryKey {
        CategoryKey {
            language: self.language.clone(),
            category: self.category.clone(),
        }
    }
}

/// Feature strings are kept raw; validation happens in the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub form_id: String,
    pub features: Vec<String>,
}

/// Fields needed to decide whether a line is worth a full decode.
/// `forms` is skipped without allocating.
#[derive(Deserialize)]
struct EntityHeader<'a> {
    #[serde(rename = "type", borrow, default)]
    kind: Option<Cow<'a, str>>,
    #[serde(borrow)]
    language: Option<Cow<'a, str>>,
    #[serde(rename = "lexicalCategory", borrow)]
    lexical_category: Option<Cow<'a, str>>,
    #[serde(default)]
    forms: Option<Vec<IgnoredAny>>,
}

#[derive(Deserialize)]
struct RawLexeme {
    id: String,
    language: String,
    #[serde(rename = "lexicalCategory")]
    lexical_category: String,
    #[serde(default)]
    forms: Vec<RawForm>,
}

#[derive(Deserialize)]
struct RawForm {
    #[serde(default)]
    id: String,
    #[serde(rename = "grammaticalFeatures", default)]
    grammatical_features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    Language,
    Category,
    NoForms,
}

#[derive(Debug)]
pub enum LineOutcome {
    Record(LexemeRecord),
    Filtered(FilterReason),
    NonLexeme,
    Blank,
    Malformed(String),
}

/// Strip the JSON array framing of a dump line: `[`, `]` and trailing commas.
pub fn entity_fragment(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim_end();
    match trimmed {
        "" | "[" | "]" => None,
        fragment => Some(fragment),
    }
}

/// Decode one dump line, applying the filter before forms are materialized.
pub fn decode_line(line: &str, filter: &ScanFilter) -> LineOutcome {
    let Some(fragment) = entity_fragment(line) else {
        return LineOutcome::Blank;
    };

    let header: EntityHeader = match serde_json::from_str(fragment) {
        Ok(header) => header,
        Err(e) => return LineOutcome::Malformed(e.to_string()),
    };

    if let Some(kind) = header.kind.as_deref() {
        if kind != "lexeme" {
            return LineOutcome::NonLexeme;
        }
    }

    let (Some(language), Some(category)) = (header.language.as_deref(), header.lexical_category.as_deref()) else {
        return LineOutcome::Malformed("lexeme without language or lexicalCategory".to_string());
    };

    if !filter.accepts_language(language) {
        return LineOutcome::Filtered(FilterReason::Language);
    }
    if !filter.accepts_category(category) {
        return LineOutcome::Filtered(FilterReason::Category);
    }
    if filter.forms_only && header.forms.as_ref().is_none_or(|forms| forms.is_empty()) {
        return LineOutcome::Filtered(FilterReason::NoForms);
    }

    let raw: RawLexeme = match serde_json::from_str(fragment) {
        Ok(raw) => raw,
        Err(e) => return LineOutcome::Malformed(e.to_string()),
    };

    LineOutcome::Record(LexemeRecord {
        entry_id: raw.id,
        language: LanguageId(raw.language),
        category: CategoryId(raw.lexical_category),
        forms: raw.forms
            .into_iter()
            .map(|form| FormRecord {
                form_id: form.id,
                features: form.grammatical_features,
            })
            .collect(),
    })
}
