mod common;

use common::*;
use lexigap::core::error::ErrorKind;
use lexigap::core::types::{CategoryKey, FeatureCombination, FeatureId};
use lexigap::corpus::miner::QueryMiner;

fn combo(ids: &[&str]) -> FeatureCombination {
    ids.iter().map(|id| FeatureId(id.to_string())).collect()
}

#[test]
fn mines_a_corpus_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_query(
        root,
        "German/nouns/query_nouns.sparql",
        &query_text(GERMAN, NOUN, &[&[NOMINATIVE, PLURAL], &[GENITIVE, SINGULAR]]),
    );
    write_query(
        root,
        "German/nouns/query_nouns_2.sparql",
        &query_text(GERMAN, NOUN, &[&[PLURAL, NOMINATIVE], &[DATIVE, PLURAL]]),
    );
    write_query(root, "French/verbs/query_verbs.sparql", &query_text(FRENCH, VERB, &[]));
    write_query(root, "README.md", "dct:language wd:Q1 ; wikibase:lexicalCategory wd:Q2");

    let mined = QueryMiner::new().unwrap().mine_dir(root).unwrap();

    assert_eq!(mined.stats.files_seen, 3);
    assert_eq!(mined.stats.files_with_key, 3);
    let german = CategoryKey::new(GERMAN, NOUN);
    let covered = mined.coverage.covered(&german).unwrap();
    assert_eq!(covered.len(), 3);
    assert!(covered.contains(&combo(&[PLURAL, NOMINATIVE])));
    assert!(covered.contains(&combo(&[DATIVE, PLURAL])));

    // Tracked even without covered combinations
    let french = CategoryKey::new(FRENCH, VERB);
    assert!(mined.coverage.is_tracked(&french));
    assert!(mined.coverage.covered(&french).unwrap().is_empty());
}

#[test]
fn files_without_a_key_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_query(dir.path(), "good.sparql", &query_text(RUSSIAN, NOUN, &[&[GENITIVE]]));
    let bad = write_query(
        dir.path(),
        "bad.sparql",
        "SELECT ?x WHERE { ?x wikibase:lexicalCategory wd:Q1084 . }",
    );

    let mined = QueryMiner::new().unwrap().mine(&[bad, good]).unwrap();
    assert_eq!(mined.stats.skipped_files, 1);
    assert_eq!(mined.coverage.len(), 1);
}

#[test]
fn duplicate_clauses_keep_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!(
        "{}\n# legacy second block\nSELECT * WHERE {{ ?l dct:language wd:{} ; wikibase:lexicalCategory wd:{} . }}\n",
        query_text(GERMAN, NOUN, &[&[DATIVE]]),
        FRENCH,
        VERB
    );
    let path = write_query(dir.path(), "legacy.sparql", &text);

    let mined = QueryMiner::new().unwrap().mine(&[path]).unwrap();
    assert_eq!(mined.stats.duplicate_clause_files, 1);
    assert!(mined.coverage.is_tracked(&CategoryKey::new(GERMAN, NOUN)));
    assert!(!mined.coverage.is_tracked(&CategoryKey::new(FRENCH, VERB)));
}

#[test]
fn corpus_without_any_key_is_exhausted() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_query(dir.path(), "empty.sparql", "SELECT ?x WHERE { ?x ?p ?o }");
    let err = QueryMiner::new().unwrap().mine(&[path]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Exhausted);
}

#[test]
fn unreadable_file_is_fatal_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_query(dir.path(), "good.sparql", &query_text(GERMAN, NOUN, &[]));
    let missing = dir.path().join("missing.sparql");

    let err = QueryMiner::new().unwrap().mine(&[good, missing]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
    assert!(err.context.contains("missing.sparql"));
}
