//! Normalizer: converts [`RawRecord`] text fields into a typed
//! [`NormalizedRecord`].
//!
//! Conversions run in a fixed order: status, request line, timestamp. The
//! first failure drops the record; it is logged at `debug` and counted in
//! [`NormalizeStats`], never written to the output stream.

use chrono::{DateTime, Utc};
use phf::phf_map;
use tokio::sync::mpsc;

use crate::error::RecordError;
use crate::types::{NormalizedRecord, RawRecord};

/// Layout of the bracketed timestamp, e.g. `13/May/2020:20:15:43 +0000`.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

static VERSION_CODES: phf::Map<&'static str, u8> = phf_map! {
    "HTTP/0.9" => 0,
    "HTTP/1.0" => 0,
    "HTTP/1.1" => 1,
    "HTTP/2.0" => 2,
};

/// Map a protocol token to its version code. Unknown protocols map to 0.
pub fn version_code(protocol: &str) -> u8 {
    VERSION_CODES.get(protocol).copied().unwrap_or(0)
}

/// The three parts of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub version: u8,
}

/// Split `METHOD PATH PROTOCOL` on the first two spaces.
///
/// The protocol token keeps anything after the second space, so a path with
/// an unescaped space yields an unknown protocol (code 0) rather than an
/// error. Fewer than three tokens is a [`RecordError::MalformedQuery`].
pub fn parse_request(line: &str) -> Result<Request, RecordError> {
    let mut tokens = line.splitn(3, ' ');
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(path), Some(protocol)) => Ok(Request {
            method: method.to_string(),
            path: path.to_string(),
            version: version_code(protocol),
        }),
        _ => Err(RecordError::MalformedQuery(line.to_string())),
    }
}

/// Any base-10 integer is a status; only non-numeric text is rejected.
pub fn parse_status(text: &str) -> Result<i32, RecordError> {
    text.parse().map_err(|source| RecordError::Status {
        text: text.to_string(),
        source,
    })
}

/// Parse a bracketed access-log timestamp into a UTC instant.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, RecordError> {
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| RecordError::Timestamp {
            text: text.to_string(),
            source,
        })
}

/// Convert one raw record. Consumes it so the pass-through fields move
/// without copying.
pub fn normalize(raw: RawRecord) -> Result<NormalizedRecord, RecordError> {
    let status = parse_status(&raw.status)?;
    let Request {
        method,
        path,
        version,
    } = parse_request(&raw.request)?;
    let time = parse_timestamp(&raw.timestamp)?;

    Ok(NormalizedRecord {
        source: raw.address,
        time,
        method,
        path,
        version,
        status,
        referrer: raw.referrer,
        agent: raw.agent,
    })
}

// ---------------------------------------------------------------------------
// Pipeline stage
// ---------------------------------------------------------------------------

/// Rejection counters for one normalizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub accepted: u64,
    pub bad_status: u64,
    pub bad_query: u64,
    pub bad_timestamp: u64,
}

impl NormalizeStats {
    pub fn rejected(&self) -> u64 {
        self.bad_status + self.bad_query + self.bad_timestamp
    }

    fn record(&mut self, err: &RecordError) {
        match err {
            RecordError::Status { .. } => self.bad_status += 1,
            RecordError::MalformedQuery(_) => self.bad_query += 1,
            RecordError::Timestamp { .. } => self.bad_timestamp += 1,
        }
    }
}

/// Normalizer stage: drain `rx`, forward successful conversions to `tx`.
///
/// Stops early if the downstream receiver is gone.
pub async fn normalize_stage(
    mut rx: mpsc::Receiver<RawRecord>,
    tx: mpsc::Sender<NormalizedRecord>,
) -> NormalizeStats {
    let mut stats = NormalizeStats::default();

    while let Some(raw) = rx.recv().await {
        match normalize(raw) {
            Ok(record) => {
                stats.accepted += 1;
                if tx.send(record).await.is_err() {
                    tracing::debug!("Normalizer output closed; stopping early");
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "Dropping record");
                stats.record(&err);
            }
        }
    }

    stats
}
