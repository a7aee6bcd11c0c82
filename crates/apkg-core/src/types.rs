//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default output file, relative to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "cards.csv";

/// Default scratch directory, relative to the working directory
pub const DEFAULT_SCRATCH_DIR: &str = "temp_apkg";

/// Paths used by a single export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where the CSV rows are written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Directory the archive is unpacked into; removed when the run ends
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SCRATCH_DIR)
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            scratch_dir: default_scratch_dir(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_dir = path.into();
        self
    }
}

/// A note's first two fields after cleaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPair {
    pub front: String,
    pub back: String,
}

impl CardPair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Why a note produced no output row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The field blob split into fewer than two fields
    TooFewFields,
    /// Front or back was empty once markup was removed
    EmptyAfterCleaning,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields => write!(f, "too few fields"),
            Self::EmptyAfterCleaning => write!(f, "empty after cleaning"),
        }
    }
}

/// Counters reported at the end of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub notes_read: usize,
    pub rows_written: usize,
    pub skipped_too_few_fields: usize,
    pub skipped_empty: usize,
    /// File name of the collection database that was read
    pub database: String,
    pub output: PathBuf,
}

impl ExportSummary {
    /// Total notes that produced no row
    pub fn skipped(&self) -> usize {
        self.skipped_too_few_fields + self.skipped_empty
    }

    /// Count a skipped note under its reason
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::TooFewFields => self.skipped_too_few_fields += 1,
            SkipReason::EmptyAfterCleaning => self.skipped_empty += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.output_path, PathBuf::from("cards.csv"));
        assert_eq!(config.scratch_dir, PathBuf::from("temp_apkg"));
    }

    #[test]
    fn test_config_partial_json_keeps_defaults() {
        let config: ExportConfig = serde_json::from_str(r#"{"output_path": "out/deck.csv"}"#).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/deck.csv"));
        assert_eq!(config.scratch_dir, PathBuf::from(DEFAULT_SCRATCH_DIR));
    }

    #[test]
    fn test_config_builder() {
        let config = ExportConfig::new()
            .with_output_path("a.csv")
            .with_scratch_dir("/tmp/scratch");
        assert_eq!(config.output_path, PathBuf::from("a.csv"));
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/scratch"));
    }

    #[test]
    fn test_summary_records_skips() {
        let mut summary = ExportSummary::default();
        summary.record_skip(SkipReason::TooFewFields);
        summary.record_skip(SkipReason::EmptyAfterCleaning);
        summary.record_skip(SkipReason::EmptyAfterCleaning);
        assert_eq!(summary.skipped_too_few_fields, 1);
        assert_eq!(summary.skipped_empty, 2);
        assert_eq!(summary.skipped(), 3);
    }
}
