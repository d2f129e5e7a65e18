use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a single document from being ingested.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported input {0:?}: only .pdf and .txt documents are accepted")]
    Unsupported(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("text extraction failed for {path:?}: {reason}")]
    Extraction { path: PathBuf, reason: String },
}

/// Degenerate input for the sentence ranker. Never escapes the pipeline:
/// callers turn it into a placeholder summary or an empty note set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummaryError {
    #[error("no sentences found in input text")]
    NoSentences,
    #[error("ranking did not converge to finite scores")]
    NonFiniteScores,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid {kind} pattern {pattern:?}: {source}")]
    Pattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
