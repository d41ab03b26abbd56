//! Pipeline: one task per stage, one bounded queue per edge.
//!
//! ```text
//! reader ──► scan ──► normalize ──► filter₁ ──► … ──► filterₙ ──► records()
//! ```
//!
//! Each stage owns the sender of its output queue and drops it once its input
//! is closed and drained, so end of input (or a fatal read error) ripples
//! down the chain and the consumer's `recv` returns `None`. Queues preserve
//! order, so records come out in input-line order.

use tokio::io::{AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{PipelineError, ScanError};
use crate::filter::{filter_stage, RecordFilter};
use crate::normalizer::{normalize_stage, NormalizeStats};
use crate::scanner::{scan_stage, ScanStats};
use crate::types::NormalizedRecord;

/// Capacity of every inter-stage queue.
pub const QUEUE_CAPACITY: usize = 64;

/// A configured, not yet running pipeline.
#[derive(Debug)]
pub struct Pipeline {
    filters: Vec<Box<dyn RecordFilter>>,
    capacity: usize,
}

impl Pipeline {
    pub fn new(filters: Vec<Box<dyn RecordFilter>>) -> Self {
        Self {
            filters,
            capacity: QUEUE_CAPACITY,
        }
    }

    /// Override the queue capacity. Values below 1 are raised to 1.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Spawn every stage on the current tokio runtime and start reading.
    pub fn spawn<R>(self, input: R) -> RunningPipeline
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (raw_tx, raw_rx) = mpsc::channel(self.capacity);
        let scanner = tokio::spawn(scan_stage(BufReader::new(input), raw_tx));

        let (norm_tx, mut upstream) = mpsc::channel(self.capacity);
        let normalizer = tokio::spawn(normalize_stage(raw_rx, norm_tx));

        let mut filters = Vec::with_capacity(self.filters.len());
        for filter in self.filters {
            let (tx, rx) = mpsc::channel(self.capacity);
            let name = filter.name();
            filters.push((name, tokio::spawn(filter_stage(filter, upstream, tx))));
            upstream = rx;
        }

        RunningPipeline {
            records: upstream,
            emitted: 0,
            scanner,
            normalizer,
            filters,
        }
    }
}

/// Handle on a spawned pipeline: pull records, then [`finish`](Self::finish).
#[derive(Debug)]
pub struct RunningPipeline {
    records: mpsc::Receiver<NormalizedRecord>,
    emitted: u64,
    scanner: JoinHandle<Result<ScanStats, ScanError>>,
    normalizer: JoinHandle<NormalizeStats>,
    filters: Vec<(&'static str, JoinHandle<u64>)>,
}

impl RunningPipeline {
    /// Next surviving record, or `None` once every stage has shut down.
    pub async fn recv(&mut self) -> Option<NormalizedRecord> {
        let record = self.records.recv().await;
        if record.is_some() {
            self.emitted += 1;
        }
        record
    }

    /// Stop consuming and collect every stage's outcome.
    ///
    /// Dropping the output queue first lets stages that are still running
    /// notice the closed channel and stop; a fully drained pipeline has
    /// already stopped. A fatal read error is reported after all stages have
    /// been joined.
    pub async fn finish(self) -> Result<PipelineReport, PipelineError> {
        let RunningPipeline {
            records,
            emitted,
            scanner,
            normalizer,
            filters,
        } = self;
        drop(records);

        let mut dropped = Vec::with_capacity(filters.len());
        for (name, handle) in filters {
            let count = handle
                .await
                .map_err(|source| PipelineError::Stage { stage: name, source })?;
            dropped.push((name, count));
        }
        let normalize = normalizer.await.map_err(|source| PipelineError::Stage {
            stage: "normalize",
            source,
        })?;
        let scan = scanner.await.map_err(|source| PipelineError::Stage {
            stage: "scan",
            source,
        })??;

        Ok(PipelineReport {
            scan,
            normalize,
            dropped,
            emitted,
        })
    }
}

/// What happened to the input, stage by stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub scan: ScanStats,
    pub normalize: NormalizeStats,
    /// Records each filter dropped, in chain order.
    pub dropped: Vec<(&'static str, u64)>,
    /// Records handed to the consumer.
    pub emitted: u64,
}

impl PipelineReport {
    pub fn log_summary(&self) {
        tracing::debug!(
            lines = self.scan.lines,
            skipped = self.scan.skipped,
            bad_status = self.normalize.bad_status,
            bad_query = self.normalize.bad_query,
            bad_timestamp = self.normalize.bad_timestamp,
            emitted = self.emitted,
            "Pipeline finished"
        );
        for (filter, dropped) in &self.dropped {
            tracing::debug!(filter, dropped, "Filter summary");
        }
    }
}
