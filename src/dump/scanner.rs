use std::collections::HashSet;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use crate::compression::stream::{open_decoder, CompressionType};
use crate::core::error::{Error, Result};
use crate::core::stats::{ExtractStats, ScanStats};
use crate::dump::record::{decode_line, FilterReason, LexemeRecord, LineOutcome};
use crate::index::extractor::FeatureExtractor;
use crate::index::observed::ObservedIndex;

/// Which lexemes survive the scan. `None` sets keep everything.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    pub languages: Option<HashSet<String>>,
    pub categories: Option<HashSet<String>>,
    pub forms_only: bool,
}

impl ScanFilter {
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn accepts_language(&self, language: &str) -> bool {
        self.languages.as_ref().is_none_or(|set| set.contains(language))
    }

    pub fn accepts_category(&self, category: &str) -> bool {
        self.categories.as_ref().is_none_or(|set| set.contains(category))
    }
}

/// Streaming reader over a (compressed) lexeme dump.
///
/// Every call to [`DumpScanner::records`] starts again from the first byte;
/// a stream cannot be resumed halfway.
pub struct DumpScanner {
    pub path: PathBuf,
    pub filter: ScanFilter,
    pub buffer_size: usize,
    pub progress_interval: u64,
}

/// Result of folding a whole dump into a fresh index
pub struct ScanOutcome {
    pub observed: ObservedIndex,
    pub stats: ScanStats,
    pub extract: ExtractStats,
}

impl DumpScanner {
    pub fn open(path: impl AsRef<Path>, filter: ScanFilter) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Fail early with the path if the dump is missing or unreadable
        File::open(&path).map_err(|e| Error::source_io(&path, e))?;

        Ok(DumpScanner {
            path,
            filter,
            buffer_size: 256 * 1024,
            progress_interval: 100_000,
        })
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Lazy record sequence; decompression happens as the caller pulls.
    pub fn records(&self) -> Result<RecordStream<'_>> {
        let (compression, reader) = open_decoder(&self.path, self.buffer_size)?;
        log::debug!("Scanning {} ({:?})", self.path.display(), compression);

        Ok(RecordStream {
            path: &self.path,
            filter: &self.filter,
            reader,
            compression,
            line: Vec::with_capacity(4096),
            stats: ScanStats::default(),
            progress_interval: self.progress_interval,
            done: false,
        })
    }

    /// Fold every record into a new ObservedIndex.
    pub fn scan(&self, extractor: &FeatureExtractor) -> Result<ScanOutcome> {
        let outcome = self.scan_shard(extractor)?;
        ensure_parsed(&self.path.display().to_string(), &outcome.stats)?;
        Ok(outcome)
    }

    /// Like `scan`, but a dump without a single parsable lexeme is not an
    /// error here. Shard scans judge exhaustion on the merged counters.
    pub fn scan_shard(&self, extractor: &FeatureExtractor) -> Result<ScanOutcome> {
        let mut observed = ObservedIndex::new();
        let mut extract = ExtractStats::default();

        let mut stream = self.records()?;
        for record in &mut stream {
            let record = record?;
            extract.absorb(extractor.extract(&record, &mut observed));
        }
        let stats = stream.close();

        log::info!(
            "Scanned {}: {} records, {} malformed, {} combinations across {} categories",
            self.path.display(),
            stats.yielded,
            stats.malformed,
            observed.combination_count(),
            observed.len(),
        );

        Ok(ScanOutcome { observed, stats, extract })
    }
}

/// A source in which no lexeme parsed at all was not really processed,
/// which is reported as exhaustion.
pub fn ensure_parsed(source: &str, stats: &ScanStats) -> Result<()> {
    if stats.parsed == 0 {
        return Err(Error::exhausted(format!(
            "{}: no lexeme record could be parsed ({} lines, {} malformed)",
            source, stats.lines, stats.malformed,
        )));
    }
    Ok(())
}

pub struct RecordStream<'a> {
    path: &'a Path,
    filter: &'a ScanFilter,
    reader: Box<dyn BufRead + Send>,
    compression: CompressionType,
    line: Vec<u8>,
    stats: ScanStats,
    progress_interval: u64,
    done: bool,
}

impl<'a> RecordStream<'a> {
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    /// Close the stream, failing with `Exhausted` if nothing parsed.
    pub fn finish(self) -> Result<ScanStats> {
        ensure_parsed(&self.path.display().to_string(), &self.stats)?;
        Ok(self.close())
    }

    /// Close the stream without the exhaustion check.
    pub fn close(self) -> ScanStats {
        if self.stats.malformed > 0 {
            log::warn!("{}: skipped {} malformed records", self.path.display(), self.stats.malformed);
        }
        self.stats
    }

    fn handle(&mut self, outcome: LineOutcome) -> Option<LexemeRecord> {
        match outcome {
            LineOutcome::Record(record) => {
                self.stats.parsed += 1;
                self.stats.yielded += 1;
                return Some(record);
            }
            LineOutcome::Filtered(reason) => {
                self.stats.parsed += 1;
                match reason {
                    FilterReason::Language => self.stats.filtered_language += 1,
                    FilterReason::Category => self.stats.filtered_category += 1,
                    FilterReason::NoForms => self.stats.filtered_no_forms += 1,
                }
            }
            LineOutcome::NonLexeme => self.stats.non_lexeme += 1,
            LineOutcome::Blank => {}
            LineOutcome::Malformed(reason) => {
                self.stats.malformed += 1;
                log::debug!("{}:{}: skipping malformed record: {}", self.path.display(), self.stats.lines, reason);
            }
        }
        None
    }
}

impl<'a> Iterator for RecordStream<'a> {
    type Item = Result<LexemeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    // Decompression or read failure: the rest of the dump is unreachable
                    self.done = true;
                    return Some(Err(Error::source_io(self.path, e)));
                }
            }

            self.stats.lines += 1;
            if self.progress_interval > 0 && self.stats.lines % self.progress_interval == 0 {
                log::info!("{}: {} lines, {} records", self.path.display(), self.stats.lines, self.stats.yielded);
            }

            let outcome = match std::str::from_utf8(&self.line) {
                Ok(text) => decode_line(text, self.filter),
                Err(e) => LineOutcome::Malformed(format!("invalid UTF-8: {}", e)),
            };

            if let Some(record) = self.handle(outcome) {
                return Some(Ok(record));
            }
        }
        None
    }
}
