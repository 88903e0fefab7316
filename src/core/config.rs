use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DEFAULT_BATCH_CAP;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query_dir: PathBuf,                 // Root of the existing .sparql corpus
    pub dump_paths: Vec<PathBuf>,           // One or more compressed lexeme dump shards
    pub form_metadata_path: PathBuf,        // Feature position table (JSON)
    pub output_dir: PathBuf,                // Where the emitter writes new queries

    pub batch_cap: usize,                   // Max combinations per generated query
    pub languages: Vec<String>,             // Language QIDs to keep; empty keeps all
    pub categories: Vec<String>,            // Lexical category QIDs to keep; empty keeps all
    pub forms_only: bool,                   // Drop lexemes without forms before extraction

    pub read_buffer_size: usize,            // Decompressed read buffer per dump
    pub progress_interval: usize,           // Log progress every N records
}

impl Default for Config {
    fn default() -> Self {
        Config {
            query_dir: PathBuf::from("./queries"),
            dump_paths: vec![PathBuf::from("./latest-lexemes.json.gz")],
            form_metadata_path: PathBuf::from("./lexeme_form_metadata.json"),
            output_dir: PathBuf::from("./missing_forms"),

            batch_cap: DEFAULT_BATCH_CAP,
            languages: Vec::new(),
            categories: Vec::new(),
            forms_only: true,

            read_buffer_size: 256 * 1024,       // 256KB
            progress_interval: 100_000,
        }
    }
}

impl Config {
    /// Load a TOML config file; missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::source_io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_cap == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "batch_cap must be at least 1".to_string()));
        }
        if self.dump_paths.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "no dump paths configured".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "read_buffer_size must be non-zero".to_string()));
        }
        Ok(())
    }
}
