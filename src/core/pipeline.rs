use std::collections::HashSet;
use chrono::Utc;
use serde::Serialize;
use crate::batch::packer::{BatchPacker, BatchPlan};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::stats::Diagnostics;
use crate::core::types::Batch;
use crate::corpus::miner::{MinedCorpus, QueryMiner};
use crate::dump::scanner::{DumpScanner, ScanFilter, ScanOutcome};
use crate::emit::emitter::QueryEmitter;
use crate::gap::position::FeaturePositionTable;
use crate::gap::resolver::GapResolver;
use crate::index::extractor::FeatureExtractor;
use crate::parallel::shards::ShardScanner;

/// Mine → scan → resolve → pack, end to end
pub struct Pipeline {
    pub config: Config,
    pub workers: usize,
}

/// Batches per category plus what was skipped on the way
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub plan: BatchPlan,
    pub diagnostics: Diagnostics,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline {
            config,
            workers: num_cpus::get(),
        })
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn scan_filter(&self) -> ScanFilter {
        let to_set = |ids: &[String]| -> Option<HashSet<String>> {
            if ids.is_empty() {
                None
            } else {
                Some(ids.iter().cloned().collect())
            }
        };
        ScanFilter {
            languages: to_set(&self.config.languages),
            categories: to_set(&self.config.categories),
            forms_only: self.config.forms_only,
        }
    }

    /// Load the position table from the configured metadata file and run.
    pub fn run(&self) -> Result<PipelineOutput> {
        let positions = FeaturePositionTable::load(&self.config.form_metadata_path)?;
        self.run_with(&positions)
    }

    /// Nothing is emitted here; a fatal error in any stage returns before
    /// a single batch reaches a downstream consumer.
    pub fn run_with(&self, positions: &FeaturePositionTable) -> Result<PipelineOutput> {
        let started_at = Utc::now();
        log::info!(
            "Starting: corpus {}, {} dump shard(s), batch cap {}",
            self.config.query_dir.display(),
            self.config.dump_paths.len(),
            self.config.batch_cap,
        );

        let packer = BatchPacker::new(self.config.batch_cap)?;

        // Mining and scanning share nothing and converge at the resolver
        let (mined, scanned) = rayon::join(|| self.mine(), || self.scan());
        let mined = mined?;
        let scanned = scanned?;

        let gaps = GapResolver::new(positions).resolve(&mined.coverage, &scanned.observed);
        let gap_keys = gaps.len();
        let gap_entries = gaps.values().map(Vec::len).sum();

        let plan = packer.pack_all(gaps);
        let batches = plan.values().map(Vec::len).sum();

        let diagnostics = Diagnostics {
            started_at,
            finished_at: Utc::now(),
            mining: mined.stats,
            scan: scanned.stats,
            extract: scanned.extract,
            observed_keys: scanned.observed.len(),
            covered_keys: mined.coverage.len(),
            gap_keys,
            gap_entries,
            batches,
        };

        log::info!(
            "Done in {}ms: {} missing combinations in {} categories, {} batches",
            diagnostics.elapsed_ms(),
            gap_entries,
            gap_keys,
            batches,
        );

        Ok(PipelineOutput { plan, diagnostics })
    }

    fn mine(&self) -> Result<MinedCorpus> {
        QueryMiner::new()?.mine_dir(&self.config.query_dir)
    }

    fn scan(&self) -> Result<ScanOutcome> {
        let filter = self.scan_filter();
        let shards = self.config.dump_paths
            .iter()
            .map(|path| {
                Ok(DumpScanner::open(path, filter.clone())?
                    .with_buffer_size(self.config.read_buffer_size)
                    .with_progress_interval(self.config.progress_interval as u64))
            })
            .collect::<Result<Vec<_>>>()?;

        ShardScanner::new(self.workers).scan(&shards, &FeatureExtractor::new())
    }
}

impl PipelineOutput {
    pub fn batch_count(&self) -> usize {
        self.plan.values().map(Vec::len).sum()
    }

    /// Hand every batch downstream, category by category.
    pub fn emit(&self, emitter: &mut dyn QueryEmitter) -> Result<usize> {
        let mut emitted = 0;
        for batches in self.plan.values() {
            for (i, batch) in batches.iter().enumerate() {
                emitter.emit(batch, i + 1)?;
                emitted += 1;
            }
        }
        emitter.finish()?;
        Ok(emitted)
    }

    /// Flat JSON view for external reporters. Category keys are not valid
    /// JSON object keys, so batches are listed rather than mapped.
    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            batches: self.plan.values().flatten().collect(),
            diagnostics: &self.diagnostics,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    batches: Vec<&'a Batch>,
    diagnostics: &'a Diagnostics,
}
