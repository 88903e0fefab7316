#![allow(dead_code)]

use std::path::{Path, PathBuf};
use lexigap::compression::stream::{compress, CompressionType};
use lexigap::gap::position::FeaturePositionTable;

pub const GERMAN: &str = "Q188";
pub const FRENCH: &str = "Q150";
pub const RUSSIAN: &str = "Q7737";
pub const NOUN: &str = "Q1084";
pub const VERB: &str = "Q24905";

pub const NOMINATIVE: &str = "Q131105";
pub const GENITIVE: &str = "Q146233";
pub const DATIVE: &str = "Q145599";
pub const ACCUSATIVE: &str = "Q146078";
pub const SINGULAR: &str = "Q110786";
pub const PLURAL: &str = "Q146786";
pub const MASCULINE: &str = "Q499327";
pub const FEMININE: &str = "Q1775415";
pub const NEUTER: &str = "Q1775461";
pub const ANIMATE: &str = "Q51927507";
pub const INANIMATE: &str = "Q51927539";
pub const INDICATIVE: &str = "Q682111";
pub const PRESENT: &str = "Q192613";
pub const FIRST_PERSON: &str = "Q21714344";

pub const FORM_METADATA: &str = r#"{
    "01_case": {
        "1": {"label": "Nominative", "qid": "Q131105"},
        "2": {"label": "Genitive", "qid": "Q146233"},
        "3": {"label": "Dative", "qid": "Q145599"},
        "4": {"label": "Accusative", "qid": "Q146078"}
    },
    "02_gender": {
        "1": {"label": "Masculine", "qid": "Q499327"},
        "2": {"label": "Feminine", "qid": "Q1775415"},
        "3": {"label": "Neuter", "qid": "Q1775461"}
    },
    "03_animacy": {
        "1": {"label": "Animate", "qid": "Q51927507"},
        "2": {"label": "Inanimate", "qid": "Q51927539"}
    },
    "04_mood": {
        "1": {"label": "Indicative", "qid": "Q682111"}
    },
    "05_tense": {
        "1": {"label": "Present", "qid": "Q192613"}
    },
    "06_person": {
        "1": {"label": "First Person", "qid": "Q21714344"}
    },
    "07_number": {
        "1": {"label": "Singular", "qid": "Q110786"},
        "2": {"label": "Plural", "qid": "Q146786"}
    }
}"#;

pub fn positions() -> FeaturePositionTable {
    FeaturePositionTable::from_json_str(FORM_METADATA).unwrap()
}

pub fn write_metadata(dir: &Path) -> PathBuf {
    let path = dir.join("lexeme_form_metadata.json");
    std::fs::write(&path, FORM_METADATA).unwrap();
    path
}

/// One dump line in the Wikidata layout, trailing comma included
pub fn lexeme_line(id: usize, language: &str, category: &str, forms: &[&[&str]]) -> String {
    let forms: Vec<String> = forms
        .iter()
        .enumerate()
        .map(|(f, features)| {
            let features: Vec<String> = features.iter().map(|q| format!("\"{}\"", q)).collect();
            format!(
                r#"{{"id":"L{}-F{}","representations":{{"en":{{"language":"en","value":"w{}"}}}},"grammaticalFeatures":[{}],"claims":{{}}}}"#,
                id,
                f + 1,
                f,
                features.join(",")
            )
        })
        .collect();
    format!(
        r#"{{"type":"lexeme","id":"L{}","language":"{}","lexicalCategory":"{}","lemmas":{{}},"forms":[{}],"senses":[]}},"#,
        id,
        language,
        category,
        forms.join(",")
    )
}

/// Wrap lines in the dump's JSON array framing and write them compressed.
pub fn write_dump(path: &Path, lines: &[String], compression: CompressionType) {
    let mut text = String::from("[\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("]\n");
    std::fs::write(path, compress(text.as_bytes(), compression).unwrap()).unwrap();
}

/// A corpus query with one OPTIONAL block per combination
pub fn query_text(language: &str, category: &str, combinations: &[&[&str]]) -> String {
    let mut query = format!(
        "# tool: scribe-data\n\
         SELECT ?lexeme ?lemma WHERE {{\n\
         \x20 ?lexeme dct:language wd:{} ;\n\
         \x20   wikibase:lexicalCategory wd:{} ;\n\
         \x20   wikibase:lemma ?lemma .\n",
        language, category
    );
    for (i, features) in combinations.iter().enumerate() {
        let features: Vec<String> = features.iter().map(|q| format!("wd:{}", q)).collect();
        query.push_str(&format!(
            "  OPTIONAL {{\n    ?lexeme ontolex:lexicalForm ?f{i}Form .\n    ?f{i}Form ontolex:representation ?f{i} ;\n      wikibase:grammaticalFeature {} .\n  }}\n",
            features.join(", ")
        ));
    }
    query.push_str("}\n");
    query
}

pub fn write_query(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, text).unwrap();
    path
}
