use std::path::{Path, PathBuf};
use rayon::prelude::*;
use walkdir::WalkDir;
use crate::core::error::{Error, Result};
use crate::core::stats::MiningStats;
use crate::corpus::clause::{ClauseMatcher, QueryClauses};
use crate::index::coverage::CoverageIndex;

pub const QUERY_EXTENSION: &str = "sparql";

/// Coverage mined from the existing query corpus
#[derive(Debug, Clone)]
pub struct MinedCorpus {
    pub coverage: CoverageIndex,
    pub stats: MiningStats,
}

/// Reads existing queries and records which combinations they retrieve
pub struct QueryMiner {
    pub matcher: ClauseMatcher,
}

impl QueryMiner {
    pub fn new() -> Result<Self> {
        Ok(QueryMiner { matcher: ClauseMatcher::new()? })
    }

    /// All `.sparql` files below `root`, sorted by path.
    pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|s| s.to_str()) == Some(QUERY_EXTENSION)
            {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn mine_file(&self, path: &Path) -> Result<QueryClauses> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::source_io(path, e))?;
        Ok(self.matcher.match_query(&source))
    }

    /// Mine every file. Files are read in parallel and folded in input
    /// order, so the result does not depend on scheduling.
    pub fn mine(&self, paths: &[PathBuf]) -> Result<MinedCorpus> {
        let mined: Vec<QueryClauses> = paths
            .par_iter()
            .map(|path| self.mine_file(path))
            .collect::<Result<Vec<_>>>()?;

        let mut coverage = CoverageIndex::new();
        let mut stats = MiningStats::default();

        for (path, clauses) in paths.iter().zip(mined) {
            stats.files_seen += 1;

            let Some(key) = clauses.key() else {
                stats.skipped_files += 1;
                log::warn!("{}: no language or lexical category clause, skipping", path.display());
                continue;
            };

            if clauses.duplicate_clauses {
                stats.duplicate_clause_files += 1;
                log::debug!("{}: repeated language or category clause, keeping the first", path.display());
            }

            stats.files_with_key += 1;
            coverage.register_key(key.clone());
            for combination in clauses.combinations {
                stats.combinations += 1;
                coverage.insert(&key, combination);
            }
        }

        if stats.files_with_key == 0 {
            return Err(Error::exhausted(format!(
                "none of {} query files declares a language and lexical category",
                stats.files_seen,
            )));
        }

        log::info!(
            "Mined {} query files: {} categories tracked, {} covered combinations, {} skipped",
            stats.files_seen,
            coverage.len(),
            coverage.combination_count(),
            stats.skipped_files,
        );

        Ok(MinedCorpus { coverage, stats })
    }

    pub fn mine_dir(&self, root: &Path) -> Result<MinedCorpus> {
        let paths = Self::discover(root)?;
        self.mine(&paths)
    }
}
