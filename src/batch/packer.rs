use std::collections::{BTreeMap, HashMap};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Batch, CategoryKey, FeatureId, GapEntry};
use crate::gap::resolver::GapReport;

pub type BatchPlan = BTreeMap<CategoryKey, Vec<Batch>>;

/// Packs ordered gap entries into batches of at most `cap` entries.
///
/// Entries sharing their first feature are kept together when the group
/// fits. Candidate groups are then placed first-fit in ascending size
/// order. This is a heuristic, not optimal bin packing; only the cap is a
/// hard guarantee.
#[derive(Debug, Clone, Copy)]
pub struct BatchPacker {
    pub cap: usize,
}

impl BatchPacker {
    pub fn new(cap: usize) -> Result<Self> {
        if cap == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "batch cap must be at least 1".to_string()));
        }
        Ok(BatchPacker { cap })
    }

    pub fn pack(&self, key: &CategoryKey, entries: Vec<GapEntry>) -> Vec<Batch> {
        let mut candidates: Vec<Vec<GapEntry>> = Vec::new();

        for group in group_by(entries, |entry| entry.first().cloned()) {
            if group.len() <= self.cap {
                candidates.push(group);
                continue;
            }

            // Oversized: split on the second feature, then chop in order
            for subgroup in group_by(group, |entry| entry.second().cloned()) {
                let mut subgroup = subgroup.into_iter().peekable();
                while subgroup.peek().is_some() {
                    candidates.push(subgroup.by_ref().take(self.cap).collect());
                }
            }
        }

        // Stable: equal sizes keep their grouping order
        candidates.sort_by_key(Vec::len);

        let mut batches = Vec::new();
        let mut running: Vec<GapEntry> = Vec::with_capacity(self.cap);
        for candidate in candidates {
            if !running.is_empty() && running.len() + candidate.len() > self.cap {
                batches.push(self.close(key, std::mem::take(&mut running)));
            }
            running.extend(candidate);
        }
        if !running.is_empty() {
            batches.push(self.close(key, running));
        }

        batches
    }

    pub fn pack_all(&self, report: GapReport) -> BatchPlan {
        report
            .into_iter()
            .map(|(key, entries)| {
                let batches = self.pack(&key, entries);
                log::debug!("{}: {} batches", key, batches.len());
                (key, batches)
            })
            .collect()
    }

    fn close(&self, key: &CategoryKey, entries: Vec<GapEntry>) -> Batch {
        debug_assert!(entries.len() <= self.cap, "batch of {} exceeds cap {}", entries.len(), self.cap);
        Batch { key: key.clone(), entries }
    }
}

/// Group entries by `key_of`, groups in order of first appearance,
/// entries in incoming order.
fn group_by<F>(entries: Vec<GapEntry>, key_of: F) -> Vec<Vec<GapEntry>>
where
    F: Fn(&GapEntry) -> Option<FeatureId>,
{
    let mut slots: HashMap<Option<FeatureId>, usize> = HashMap::new();
    let mut groups: Vec<Vec<GapEntry>> = Vec::new();

    for entry in entries {
        let slot = *slots.entry(key_of(&entry)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(entry);
    }

    groups
}
