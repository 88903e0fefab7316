use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Outcome of mining the query corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningStats {
    pub files_seen: usize,
    pub files_with_key: usize,
    pub skipped_files: usize,          // No language or category clause
    pub duplicate_clause_files: usize, // More than one language/category clause
    pub combinations: usize,
}

impl MiningStats {
    pub fn absorb(&mut self, other: &MiningStats) {
        self.files_seen += other.files_seen;
        self.files_with_key += other.files_with_key;
        self.skipped_files += other.skipped_files;
        self.duplicate_clause_files += other.duplicate_clause_files;
        self.combinations += other.combinations;
    }
}

/// Record-level counters of one dump scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub lines: u64,
    pub parsed: u64,            // Lexeme records that parsed, before filtering
    pub yielded: u64,           // Records handed to the consumer
    pub malformed: u64,         // Unparsable fragments
    pub filtered_language: u64,
    pub filtered_category: u64,
    pub filtered_no_forms: u64,
    pub non_lexeme: u64,
}

impl ScanStats {
    pub fn absorb(&mut self, other: &ScanStats) {
        self.lines += other.lines;
        self.parsed += other.parsed;
        self.yielded += other.yielded;
        self.malformed += other.malformed;
        self.filtered_language += other.filtered_language;
        self.filtered_category += other.filtered_category;
        self.filtered_no_forms += other.filtered_no_forms;
        self.non_lexeme += other.non_lexeme;
    }
}

/// Per-record counters from the feature extractor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractStats {
    pub forms: u64,
    pub inserted: u64,          // New combinations
    pub foreign_features: u64,  // Dropped ids outside the item namespace
    pub featureless_forms: u64,
}

impl ExtractStats {
    pub fn absorb(&mut self, other: ExtractStats) {
        self.forms += other.forms;
        self.inserted += other.inserted;
        self.foreign_features += other.foreign_features;
        self.featureless_forms += other.featureless_forms;
    }
}

/// Summary handed back to the caller with the batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mining: MiningStats,
    pub scan: ScanStats,
    pub extract: ExtractStats,
    pub observed_keys: usize,
    pub covered_keys: usize,
    pub gap_keys: usize,
    pub gap_entries: usize,
    pub batches: usize,
}

impl Diagnostics {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
