mod common;

use std::collections::HashMap;
use common::*;
use lexigap::batch::packer::BatchPacker;
use lexigap::core::types::{CategoryKey, FeatureCombination, FeatureId, DEFAULT_BATCH_CAP};
use lexigap::gap::resolver::GapResolver;
use lexigap::index::coverage::CoverageIndex;
use lexigap::index::observed::ObservedIndex;

fn combo(ids: &[&str]) -> FeatureCombination {
    ids.iter().map(|id| FeatureId(id.to_string())).collect()
}

fn ids(raw: &[&str]) -> Vec<FeatureId> {
    raw.iter().map(|id| FeatureId(id.to_string())).collect()
}

#[test]
fn empty_coverage_yields_one_batch_in_table_order() {
    let positions = positions();
    let key = CategoryKey::new(GERMAN, NOUN);
    let mut observed = ObservedIndex::new();
    observed.insert(&key, combo(&[DATIVE, PLURAL]));
    observed.insert(&key, combo(&[SINGULAR, ACCUSATIVE]));

    let gaps = GapResolver::new(&positions).resolve(&CoverageIndex::new(), &observed);
    let plan = BatchPacker::new(DEFAULT_BATCH_CAP).unwrap().pack_all(gaps);

    let batches = &plan[&key];
    assert_eq!(batches.len(), 1);
    let features: Vec<&Vec<FeatureId>> = batches[0].entries.iter().map(|e| &e.features).collect();
    // Dative precedes Accusative in the table, so [Dative, Plural] comes first
    assert_eq!(features, vec![&ids(&[DATIVE, PLURAL]), &ids(&[ACCUSATIVE, SINGULAR])]);
}

#[test]
fn accusative_first_when_table_says_so() {
    let positions = lexigap::gap::position::FeaturePositionTable::from_ordered(
        "case",
        [(ACCUSATIVE, "Accusative"), (DATIVE, "Dative"), (SINGULAR, "Singular"), (PLURAL, "Plural")],
    )
    .unwrap();
    let key = CategoryKey::new(GERMAN, NOUN);
    let mut observed = ObservedIndex::new();
    observed.insert(&key, combo(&[DATIVE, PLURAL]));
    observed.insert(&key, combo(&[ACCUSATIVE, SINGULAR]));

    let gaps = GapResolver::new(&positions).resolve(&CoverageIndex::new(), &observed);
    assert_eq!(gaps[&key][0].features, ids(&[ACCUSATIVE, SINGULAR]));
    assert_eq!(gaps[&key][1].features, ids(&[DATIVE, PLURAL]));
}

#[test]
fn full_coverage_yields_nothing_for_that_key() {
    let positions = positions();
    let key = CategoryKey::new(FRENCH, VERB);
    let mut observed = ObservedIndex::new();
    let mut coverage = CoverageIndex::new();
    for features in [&[INDICATIVE, PRESENT][..], &[INDICATIVE, PRESENT, FIRST_PERSON, SINGULAR][..]] {
        observed.insert(&key, combo(features));
        coverage.insert(&key, combo(features));
    }
    coverage.insert(&key, combo(&[PLURAL]));

    let gaps = GapResolver::new(&positions).resolve(&coverage, &observed);
    assert!(!gaps.contains_key(&key));
    let plan = BatchPacker::new(DEFAULT_BATCH_CAP).unwrap().pack_all(gaps);
    assert!(plan.get(&key).is_none());
}

#[test]
fn oversized_group_is_split_by_second_feature() {
    let positions = positions();
    let key = CategoryKey::new(RUSSIAN, NOUN);
    let combinations: Vec<&[&str]> = vec![
        &[GENITIVE],
        &[GENITIVE, SINGULAR],
        &[GENITIVE, PLURAL],
        &[GENITIVE, MASCULINE, SINGULAR],
        &[GENITIVE, FEMININE, SINGULAR],
        &[GENITIVE, NEUTER, SINGULAR],
        &[GENITIVE, MASCULINE, PLURAL],
        &[GENITIVE, FEMININE, PLURAL],
        &[GENITIVE, NEUTER, PLURAL],
        &[GENITIVE, MASCULINE, ANIMATE, SINGULAR],
        &[GENITIVE, MASCULINE, INANIMATE, SINGULAR],
        &[GENITIVE, MASCULINE, ANIMATE, PLURAL],
        &[GENITIVE, MASCULINE, INANIMATE, PLURAL],
        &[GENITIVE, FEMININE, ANIMATE, SINGULAR],
    ];
    let mut observed = ObservedIndex::new();
    for features in &combinations {
        observed.insert(&key, combo(features));
    }

    let gaps = GapResolver::new(&positions).resolve(&CoverageIndex::new(), &observed);
    assert_eq!(gaps[&key].len(), 14);
    assert!(gaps[&key].iter().all(|e| e.first().unwrap().as_str() == GENITIVE));

    let batches = BatchPacker::new(6).unwrap().pack(&key, gaps[&key].clone());
    assert!(batches.len() >= 3);
    assert!(batches.iter().all(|b| b.len() <= 6));
    assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 14);

    // Second-feature subgroups that fit the cap are never torn apart
    let mut subgroup_sizes: HashMap<Option<FeatureId>, usize> = HashMap::new();
    for entry in &gaps[&key] {
        *subgroup_sizes.entry(entry.second().cloned()).or_default() += 1;
    }
    for (second, size) in subgroup_sizes.iter().filter(|(_, size)| **size <= 6) {
        let holding: Vec<usize> = batches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.entries.iter().any(|e| e.second().cloned() == *second))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(holding.len(), 1, "subgroup {:?} of {} split across batches", second, size);
    }
}

#[test]
fn resolution_is_deterministic() {
    let positions = positions();
    let mut observed = ObservedIndex::new();
    let mut coverage = CoverageIndex::new();
    for language in [GERMAN, FRENCH, RUSSIAN] {
        let key = CategoryKey::new(language, NOUN);
        for features in [
            &[NOMINATIVE, SINGULAR][..],
            &[GENITIVE, PLURAL][..],
            &[DATIVE][..],
            &["Q999999", SINGULAR][..],
            &["Q999998", SINGULAR][..],
        ] {
            observed.insert(&key, combo(features));
        }
        coverage.insert(&key, combo(&[DATIVE]));
    }

    let resolver = GapResolver::new(&positions);
    let first = serde_json::to_string(&resolver.resolve(&coverage, &observed).into_values().collect::<Vec<_>>()).unwrap();
    let second = serde_json::to_string(&resolver.resolve(&coverage, &observed).into_values().collect::<Vec<_>>()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn adding_coverage_never_grows_the_gap() {
    let positions = positions();
    let key = CategoryKey::new(GERMAN, NOUN);
    let mut observed = ObservedIndex::new();
    for features in [&[NOMINATIVE][..], &[GENITIVE, SINGULAR][..], &[DATIVE, PLURAL][..]] {
        observed.insert(&key, combo(features));
    }

    let resolver = GapResolver::new(&positions);
    let mut coverage = CoverageIndex::new();
    let before = resolver.resolve(&coverage, &observed)[&key].len();

    coverage.insert(&key, combo(&[GENITIVE, SINGULAR]));
    let after = resolver.resolve(&coverage, &observed)[&key].len();
    coverage.insert(&key, combo(&[ACCUSATIVE]));
    let unrelated = resolver.resolve(&coverage, &observed)[&key].len();

    assert_eq!(before, 3);
    assert_eq!(after, 2);
    assert_eq!(unrelated, 2);
}
