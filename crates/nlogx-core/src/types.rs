//! Core record types for nlogx-core.
//!
//! This module defines the two data structures that flow through the
//! pipeline: the untyped [`RawRecord`] emitted by the scanner and the typed
//! [`NormalizedRecord`] that the normalizer produces and the filters and
//! renderers consume.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of fields on a well-formed combined-format line.
pub const FIELD_COUNT: usize = 9;

/// Nine positional fields delimited from one input line, still as text.
///
/// Field contents are un-delimited: the brackets around the timestamp and the
/// quotes around the request line, referrer and agent are not included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub address: String,
    pub identity: String,
    pub user: String,
    pub timestamp: String,
    pub request: String,
    pub status: String,
    pub size: String,
    pub referrer: String,
    pub agent: String,
}

impl TryFrom<Vec<String>> for RawRecord {
    type Error = Vec<String>;

    /// Succeeds only for exactly [`FIELD_COUNT`] fields; otherwise hands the
    /// fields back untouched.
    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        let [address, identity, user, timestamp, request, status, size, referrer, agent]: [String;
            FIELD_COUNT] = fields.try_into()?;
        Ok(Self {
            address,
            identity,
            user,
            timestamp,
            request,
            status,
            size,
            referrer,
            agent,
        })
    }
}

/// A typed, validated access-log record.
///
/// A value only exists once every conversion succeeded. The serialized form
/// is the JSON-lines output shape: keys `src`, `t`, `method`, `path`,
/// `version`, `status`, `referrer`, `agent`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// Remote address, verbatim.
    #[serde(rename = "src")]
    pub source: String,
    /// Event time at one-second resolution, serialized as epoch seconds.
    #[serde(rename = "t", with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    pub method: String,
    /// Request target as sent, query string included.
    pub path: String,
    /// Protocol version code: 0 for HTTP/0.9, HTTP/1.0 and anything
    /// unrecognized, 1 for HTTP/1.1, 2 for HTTP/2.0.
    pub version: u8,
    /// Any base-10 integer, range unchecked.
    pub status: i32,
    /// `-` when the client sent none.
    pub referrer: String,
    /// `-` when the client sent none.
    pub agent: String,
}
