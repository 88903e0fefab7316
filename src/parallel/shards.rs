use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::{ExtractStats, ScanStats};
use crate::dump::scanner::{ensure_parsed, DumpScanner, ScanOutcome};
use crate::index::extractor::FeatureExtractor;
use crate::index::observed::ObservedIndex;

/// Scans dump shards in parallel. Each shard folds into its own index and
/// the indexes are merged afterwards; no state is shared while scanning.
/// A shard without lexemes is only a warning; the scan is exhausted when
/// no shard parsed anything.
pub struct ShardScanner {
    pub workers: usize,
    pub progress: Arc<AtomicUsize>,
}

impl ShardScanner {
    pub fn new(workers: usize) -> Self {
        ShardScanner {
            workers: workers.max(1),
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shards finished so far
    pub fn get_progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn scan(&self, shards: &[DumpScanner], extractor: &FeatureExtractor) -> Result<ScanOutcome> {
        self.progress.store(0, Ordering::Relaxed);
        let total = shards.len();

        let outcomes: Vec<ScanOutcome> = if shards.len() <= 1 || self.workers == 1 {
            shards
                .iter()
                .map(|shard| self.scan_one(shard, extractor, total))
                .collect::<Result<Vec<_>>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers.min(shards.len()))
                .build()
                .map_err(|e| Error::new(ErrorKind::Internal, format!("thread pool: {}", e)))?;

            pool.install(|| {
                shards
                    .par_iter()
                    .map(|shard| self.scan_one(shard, extractor, total))
                    .collect::<Result<Vec<_>>>()
            })?
        };

        let merged = merge_outcomes(outcomes);
        ensure_parsed(&format!("{} dump shards", total), &merged.stats)?;
        Ok(merged)
    }

    fn scan_one(&self, shard: &DumpScanner, extractor: &FeatureExtractor, total: usize) -> Result<ScanOutcome> {
        let outcome = shard.scan_shard(extractor)?;
        if outcome.stats.parsed == 0 {
            log::warn!("{}: no lexeme record could be parsed", shard.path.display());
        }
        let done = self.progress.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!("Shard progress: {}/{} ({})", done, total, shard.path.display());
        Ok(outcome)
    }
}

/// Union of shard indexes, counters summed
pub fn merge_outcomes(outcomes: Vec<ScanOutcome>) -> ScanOutcome {
    let mut observed = ObservedIndex::new();
    let mut stats = ScanStats::default();
    let mut extract = ExtractStats::default();

    for outcome in outcomes {
        observed.merge(outcome.observed);
        stats.absorb(&outcome.stats);
        extract.absorb(outcome.extract);
    }

    ScanOutcome { observed, stats, extract }
}
