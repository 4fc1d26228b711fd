use std::fmt;
use std::ops::AddAssign;
use std::path::PathBuf;

/// Column order of the records artifact.
pub const HEADERS: [&str; 5] = ["value", "type", "file", "language", "confidence"];

/// Raw bytes of one input file plus the encoding its header declares.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub encoding: String,
}

/// A located tag occurrence. Offsets are byte offsets into the scanned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub body: &'a str,
}

/// Structural category of an extracted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Table,
    Epigraph,
    Poem,
    Cite,
    Title,
    Subtitle,
    Text,
    /// Label of the synthetic header row; never produced by extraction.
    Header,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Table => "table",
            RecordType::Epigraph => "epigraph",
            RecordType::Poem => "poem",
            RecordType::Cite => "cite",
            RecordType::Title => "title",
            RecordType::Subtitle => "subtitle",
            RecordType::Text => "text",
            RecordType::Header => "header",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a language detection call. `language: None` means detection was
/// unavailable (shallow mode), not that the text has no language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGuess {
    pub language: Option<String>,
    pub confidence: f32,
}

impl LanguageGuess {
    pub fn shallow() -> Self {
        LanguageGuess {
            language: None,
            confidence: 0.0,
        }
    }
}

/// One row of the records artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    pub value: String,
    pub record_type: RecordType,
    pub file: String,
    pub language: Option<String>,
    pub confidence: f32,
}

impl ExtractedRecord {
    /// A record freshly pulled out of the body, not yet classified.
    pub fn unclassified(value: String, record_type: RecordType) -> Self {
        ExtractedRecord {
            value,
            record_type,
            file: String::new(),
            language: None,
            confidence: 0.0,
        }
    }
}

/// Per-file result reported by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Both artifacts were (re)written.
    Processed,
    /// Artifacts already existed and force mode was off.
    Ignored,
    /// The file was skipped because of an error; the batch continues.
    Failed(String),
}

/// Aggregated counters over a set of worker outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: u64,
    pub ignored: u64,
    pub failed: u64,
    pub total: u64,
}

impl BatchSummary {
    pub fn new(total: u64) -> Self {
        BatchSummary {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &WorkerOutcome) {
        match outcome {
            WorkerOutcome::Processed => self.processed += 1,
            WorkerOutcome::Ignored => self.ignored += 1,
            WorkerOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn done(&self) -> u64 {
        self.processed + self.ignored + self.failed
    }
}

impl AddAssign for BatchSummary {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.ignored += other.ignored;
        self.failed += other.failed;
        self.total += other.total;
    }
}
