//! Error types for the nlogx pipeline.
//!
//! Only [`ScanError`] and [`ConfigError`] ever reach the process boundary.
//! [`RecordError`] is handled inside the normalizer: the record is dropped,
//! the reason is logged and counted.

use thiserror::Error;

/// Fatal input failure. Ends the scan; records already queued still drain.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Why a raw record could not be turned into a typed one.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid status {text:?}: {source}")]
    Status {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid query {0:?}")]
    MalformedQuery(String),

    #[error("invalid date {text:?}: {source}")]
    Timestamp {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Startup failure while building the filter chain.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to build the {list} matcher from {expr:?}: {source}")]
    Pattern {
        list: &'static str,
        expr: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load filter lists: {0}")]
    Load(#[from] config::ConfigError),
}

/// A pipeline run that did not reach the end of its input cleanly.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{stage} stage terminated abnormally: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}
