use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write as _};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Write as _};
use std::path::{Path, PathBuf};
use crate::core::error::{Error, Result};
use crate::core::types::{Batch, CategoryKey, FeatureId, GapEntry};
use crate::emit::emitter::QueryEmitter;
use crate::gap::position::FeaturePositionTable;

/// Writes one `.sparql` file per batch in the shape of the existing corpus,
/// so that generated queries are picked up by the miner on the next run.
///
/// Existing files are never replaced: when `<lang>_<cat>_<nn>.sparql` is
/// taken, the next free ordinal is used instead.
pub struct SparqlEmitter<'a> {
    pub output_dir: PathBuf,
    pub positions: &'a FeaturePositionTable,
    pub written: Vec<PathBuf>,
    next_free: HashMap<CategoryKey, usize>,
}

impl<'a> SparqlEmitter<'a> {
    pub fn new(output_dir: impl AsRef<Path>, positions: &'a FeaturePositionTable) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|e| Error::source_io(&output_dir, e))?;
        Ok(SparqlEmitter {
            output_dir,
            positions,
            written: Vec::new(),
            next_free: HashMap::new(),
        })
    }

    pub fn file_name(batch: &Batch, ordinal: usize) -> String {
        format!("{}_{}_{:02}.sparql", batch.key.language, batch.key.category, ordinal)
    }
}

impl<'a> QueryEmitter for SparqlEmitter<'a> {
    fn emit(&mut self, batch: &Batch, ordinal: usize) -> Result<()> {
        let mut ordinal = ordinal.max(self.next_free.get(&batch.key).copied().unwrap_or(1));

        let (path, mut file) = loop {
            let path = self.output_dir.join(Self::file_name(batch, ordinal));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == IoErrorKind::AlreadyExists => ordinal += 1,
                Err(e) => return Err(Error::source_io(&path, e)),
            }
        };
        self.next_free.insert(batch.key.clone(), ordinal + 1);

        let query = render_query(batch, ordinal, self.positions)?;
        file.write_all(query.as_bytes()).map_err(|e| Error::source_io(&path, e))?;
        log::debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::info!("Wrote {} queries to {}", self.written.len(), self.output_dir.display());
        Ok(())
    }
}

/// Variable name for a gap entry: lower camel case of the feature labels,
/// e.g. Nominative + Plural -> `nominativePlural`.
pub fn variable_name(features: &[FeatureId], positions: &FeaturePositionTable) -> String {
    let mut name = String::new();
    for id in features {
        let label = positions.label(id).unwrap_or(id.as_str());
        for word in label.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                if name.is_empty() {
                    name.extend(first.to_lowercase());
                } else {
                    name.extend(first.to_uppercase());
                }
                name.push_str(chars.as_str());
            }
        }
    }
    if name.is_empty() {
        name.push_str("form");
    }
    name
}

fn unique_names(entries: &[GapEntry], positions: &FeaturePositionTable) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| {
            let base = variable_name(&entry.features, positions);
            let mut name = base.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{}{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

pub fn render_query(batch: &Batch, ordinal: usize, positions: &FeaturePositionTable) -> std::result::Result<String, fmt::Error> {
    let names = unique_names(&batch.entries, positions);
    let mut query = String::new();

    writeln!(query, "# tool: lexigap")?;
    writeln!(
        query,
        "# Missing forms of language {} and lexical category {} (batch {}).",
        batch.key.language, batch.key.category, ordinal
    )?;
    writeln!(query, "# Enter this query at https://query.wikidata.org/.")?;
    writeln!(query)?;
    writeln!(query, "SELECT")?;
    writeln!(query, "  (REPLACE(STR(?lexeme), \"http://www.wikidata.org/entity/\", \"\") AS ?lexemeID)")?;
    writeln!(query, "  ?lemma")?;
    for name in &names {
        writeln!(query, "  ?{}", name)?;
    }
    writeln!(query)?;
    writeln!(query, "WHERE {{")?;
    writeln!(query, "  ?lexeme dct:language wd:{} ;", batch.key.language)?;
    writeln!(query, "    wikibase:lexicalCategory wd:{} ;", batch.key.category)?;
    writeln!(query, "    wikibase:lemma ?lemma .")?;

    for (entry, name) in batch.entries.iter().zip(&names) {
        let features = entry
            .features
            .iter()
            .map(|id| format!("wd:{}", id))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(query)?;
        writeln!(query, "  OPTIONAL {{")?;
        writeln!(query, "    ?lexeme ontolex:lexicalForm ?{}Form .", name)?;
        writeln!(query, "    ?{}Form ontolex:representation ?{} ;", name, name)?;
        writeln!(query, "      wikibase:grammaticalFeature {} .", features)?;
        writeln!(query, "  }}")?;
    }
    writeln!(query, "}}")?;

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FeaturePositionTable {
        FeaturePositionTable::from_ordered(
            "grammar",
            [("Q131105", "Nominative"), ("Q146786", "Plural"), ("Q192613", "present tense")],
        )
        .unwrap()
    }

    fn entry(features: &[&str]) -> GapEntry {
        GapEntry {
            key: CategoryKey::new("Q188", "Q1084"),
            features: features.iter().map(|f| FeatureId(f.to_string())).collect(),
        }
    }

    #[test]
    fn variable_names_are_camel_case_labels() {
        let positions = table();
        let ids = vec![FeatureId("Q131105".into()), FeatureId("Q146786".into())];
        assert_eq!(variable_name(&ids, &positions), "nominativePlural");
        assert_eq!(variable_name(&[FeatureId("Q192613".into())], &positions), "presentTense");
        assert_eq!(variable_name(&[FeatureId("Q5".into())], &positions), "q5");
    }

    #[test]
    fn rendered_query_lists_every_entry() {
        let positions = table();
        let batch = Batch {
            key: CategoryKey::new("Q188", "Q1084"),
            entries: vec![entry(&["Q131105", "Q146786"]), entry(&["Q146786"])],
        };
        let query = render_query(&batch, 1, &positions).unwrap();

        assert!(query.contains("?lexeme dct:language wd:Q188 ;"));
        assert!(query.contains("wikibase:lexicalCategory wd:Q1084 ;"));
        assert!(query.contains("wikibase:grammaticalFeature wd:Q131105, wd:Q146786 ."));
        assert!(query.contains("?plural"));
        assert_eq!(query.matches("OPTIONAL {").count(), 2);
    }
}
