use regex::Regex;
use serde::{Serialize, Deserialize};
use crate::core::error::Result;
use crate::core::ident::prefixed_item_list;
use crate::core::types::{CategoryId, CategoryKey, FeatureCombination, FeatureId, LanguageId};

const LANGUAGE_PATTERN: &str = r"dct:language\s+wd:(Q\d+)";
const CATEGORY_PATTERN: &str = r"wikibase:lexicalCategory\s+wd:(Q\d+)";
const OPTIONAL_PATTERN: &str = r"(?i)\bOPTIONAL\s*\{";
const FEATURE_PATTERN: &str = r"wikibase:grammaticalFeature\s+";

/// What a query file declares. Missing clauses stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClauses {
    pub language: Option<LanguageId>,
    pub category: Option<CategoryId>,
    pub combinations: Vec<FeatureCombination>,
    pub duplicate_clauses: bool,
}

impl QueryClauses {
    pub fn key(&self) -> Option<CategoryKey> {
        match (&self.language, &self.category) {
            (Some(language), Some(category)) => Some(CategoryKey {
                language: language.clone(),
                category: category.clone(),
            }),
            _ => None,
        }
    }
}

/// Pattern matcher for the three clause shapes of a lexeme query:
/// the language clause, the lexical category clause and optional
/// form retrieval blocks. It does not parse SPARQL.
pub struct ClauseMatcher {
    language: Regex,
    category: Regex,
    optional: Regex,
    feature: Regex,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl ClauseMatcher {
    pub fn new() -> Result<Self> {
        Ok(ClauseMatcher {
            language: Regex::new(LANGUAGE_PATTERN)?,
            category: Regex::new(CATEGORY_PATTERN)?,
            optional: Regex::new(OPTIONAL_PATTERN)?,
            feature: Regex::new(FEATURE_PATTERN)?,
        })
    }

    pub fn match_query(&self, source: &str) -> QueryClauses {
        let text = strip_comments(source);

        let (language, dup_language) = first_capture(&self.language, &text);
        let (category, dup_category) = first_capture(&self.category, &text);

        QueryClauses {
            language: language.map(LanguageId),
            category: category.map(CategoryId),
            combinations: self.optional_combinations(&text),
            duplicate_clauses: dup_language || dup_category,
        }
    }

    /// One combination per OPTIONAL block. Features belong to the innermost
    /// block that encloses them.
    fn optional_combinations(&self, text: &str) -> Vec<FeatureCombination> {
        let spans: Vec<Span> = self.optional
            .find_iter(text)
            .filter_map(|m| block_span(text, m.end() - 1))
            .collect();

        let mut features: Vec<Vec<FeatureId>> = vec![Vec::new(); spans.len()];
        for m in self.feature.find_iter(text) {
            let innermost = spans
                .iter()
                .enumerate()
                .filter(|(_, span)| span.start < m.start() && m.end() <= span.end)
                .max_by_key(|(_, span)| span.start)
                .map(|(i, _)| i);

            let Some(block) = innermost else { continue };
            if let Ok((_, ids)) = prefixed_item_list(&text[m.end()..]) {
                features[block].extend(ids.into_iter().map(|id| FeatureId(id.to_string())));
            }
        }

        features
            .into_iter()
            .filter(|ids| !ids.is_empty())
            .map(FeatureCombination::new)
            .collect()
    }
}

fn first_capture(pattern: &Regex, text: &str) -> (Option<String>, bool) {
    let mut captures = pattern.captures_iter(text);
    let first = captures.next().map(|c| c[1].to_string());
    let duplicated = captures.next().is_some();
    (first, duplicated)
}

/// Span from an opening brace to its matching closing brace.
fn block_span(text: &str, open: usize) -> Option<Span> {
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(Span { start: open, end: open + offset + 1 });
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop `#` comments, whole-line or trailing. A `#` inside an IRI
/// (`<http://...#x>`) or a string literal does not start a comment.
fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| &line[..comment_start(line).unwrap_or(line.len())])
        .collect::<Vec<_>>()
        .join("\n")
}

fn comment_start(line: &str) -> Option<usize> {
    let mut in_iri = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '#' if !in_iri => return Some(idx),
            '<' => in_iri = true,
            '>' => in_iri = false,
            // IRIs never contain whitespace, so a bare `<` was a comparison
            _ if c.is_whitespace() => in_iri = false,
            '"' | '\'' if !in_iri => quote = Some(c),
            _ => {}
        }
    }
    None
}
