//! nlogx-core: scanner, normalizer and filter pipeline.
//!
//! # Architecture
//!
//! ```text
//! bytes ──► Scanner ──► Normalizer ──► Filter … Filter ──► renderer
//!          RawRecord   NormalizedRecord
//! ```
//!
//! Every stage is usable on its own (the blocking [`scanner::scan`]
//! iterator, [`normalizer::normalize`], [`filter::RecordFilter::rejects`])
//! and as a tokio task wired into a [`Pipeline`] through bounded channels.

pub mod config;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod scanner;
pub mod types;

pub use config::FilterConfig;
pub use error::{ConfigError, PipelineError, RecordError, ScanError};
pub use filter::{build_chain, FilterSettings, RecordFilter};
pub use pipeline::{Pipeline, PipelineReport, RunningPipeline};
pub use types::{NormalizedRecord, RawRecord};
