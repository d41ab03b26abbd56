//! Record filters: stateless "should reject" predicates over
//! [`NormalizedRecord`].
//!
//! Every filter looks only at the record in hand, so a chain of them is
//! commutative: any ordering drops the same records. A disabled filter is
//! kept in the chain and never rejects, so the pipeline has the same shape
//! whatever the flags.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Days, Local, TimeZone, Utc};
use regex::Regex;
use tokio::sync::mpsc;

use crate::config::FilterConfig;
use crate::error::ConfigError;
use crate::types::NormalizedRecord;

/// A predicate deciding whether a record is dropped.
pub trait RecordFilter: Send + Sync + fmt::Debug {
    /// Short stable name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// `true` drops the record.
    fn rejects(&self, record: &NormalizedRecord) -> bool;

    /// `false` when the filter was built disabled and passes everything.
    fn is_active(&self) -> bool;
}

/// `true` when no filter in `filters` rejects `record`.
pub fn retains(filters: &[Box<dyn RecordFilter>], record: &NormalizedRecord) -> bool {
    !filters.iter().any(|f| f.rejects(record))
}

/// OR a list of regex fragments into one matcher. `None` for an empty list.
pub fn alternation(list: &'static str, patterns: &[String]) -> Result<Option<Regex>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let expr = patterns.join("|");
    Regex::new(&expr)
        .map(Some)
        .map_err(|source| ConfigError::Pattern { list, expr, source })
}

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// Drops records older than a retention window ending "now".
#[derive(Debug, Clone)]
pub struct DateWindow {
    oldest: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Window of `days` ending at the current local time. `days <= 0`
    /// disables it.
    pub fn new(days: i64) -> Self {
        Self::ending_at(days, Local::now())
    }

    /// Window of `days` calendar days ending at `now`, stepped back in the
    /// zone of `now`: across a DST change the window is 23 or 25 hours per
    /// day. The cutoff is computed once here.
    pub fn ending_at<Tz: TimeZone>(days: i64, now: DateTime<Tz>) -> Self {
        let oldest = u64::try_from(days).ok().filter(|&d| d > 0).map(|d| {
            let utc = now.with_timezone(&Utc);
            // A cutoff inside a skipped local hour falls back to UTC days.
            now.checked_sub_days(Days::new(d))
                .map(|cutoff| cutoff.with_timezone(&Utc))
                .or_else(|| utc.checked_sub_days(Days::new(d)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        Self { oldest }
    }

    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.oldest
    }
}

impl RecordFilter for DateWindow {
    fn name(&self) -> &'static str {
        "date"
    }

    // Compared at one-second resolution, like the records themselves.
    fn rejects(&self, record: &NormalizedRecord) -> bool {
        self.oldest
            .is_some_and(|oldest| record.time.timestamp() < oldest.timestamp())
    }

    fn is_active(&self) -> bool {
        self.oldest.is_some()
    }
}

// ---------------------------------------------------------------------------
// Source address
// ---------------------------------------------------------------------------

/// Allow- or deny-list over the exact source address text.
#[derive(Debug, Clone)]
pub enum SourceFilter {
    Off,
    /// Keep only these addresses.
    Allow(HashSet<String>),
    /// Drop these addresses.
    Deny(HashSet<String>),
}

impl SourceFilter {
    /// A non-empty `allow` list wins outright; otherwise `deny` enables the
    /// built-in `denied` set. The two never combine.
    pub fn new(allow: &[String], deny: bool, denied: &[String]) -> Self {
        if !allow.is_empty() {
            SourceFilter::Allow(allow.iter().cloned().collect())
        } else if deny {
            SourceFilter::Deny(denied.iter().cloned().collect())
        } else {
            SourceFilter::Off
        }
    }
}

impl RecordFilter for SourceFilter {
    fn name(&self) -> &'static str {
        "source"
    }

    fn rejects(&self, record: &NormalizedRecord) -> bool {
        match self {
            SourceFilter::Off => false,
            SourceFilter::Allow(set) => !set.contains(&record.source),
            SourceFilter::Deny(set) => set.contains(&record.source),
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, SourceFilter::Off)
    }
}

// ---------------------------------------------------------------------------
// User agent
// ---------------------------------------------------------------------------

/// Drops automated clients and requests without a user agent.
#[derive(Debug, Clone)]
pub struct AgentFilter {
    enabled: bool,
    matcher: Option<Regex>,
}

impl AgentFilter {
    pub fn new(enabled: bool, patterns: &[String]) -> Result<Self, ConfigError> {
        let matcher = if enabled {
            alternation("agent", patterns)?
        } else {
            None
        };
        Ok(Self { enabled, matcher })
    }
}

impl RecordFilter for AgentFilter {
    fn name(&self) -> &'static str {
        "agent"
    }

    fn rejects(&self, record: &NormalizedRecord) -> bool {
        self.enabled
            && (record.agent == "-"
                || self
                    .matcher
                    .as_ref()
                    .is_some_and(|re| re.is_match(&record.agent)))
    }

    fn is_active(&self) -> bool {
        self.enabled
    }
}

// ---------------------------------------------------------------------------
// Referrer
// ---------------------------------------------------------------------------

/// Drops known-unwanted referrers. Active whenever its list is non-empty.
#[derive(Debug, Clone)]
pub struct ReferrerFilter {
    matcher: Option<Regex>,
}

impl ReferrerFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: alternation("referrer", patterns)?,
        })
    }
}

impl RecordFilter for ReferrerFilter {
    fn name(&self) -> &'static str {
        "referrer"
    }

    fn rejects(&self, record: &NormalizedRecord) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|re| re.is_match(&record.referrer))
    }

    fn is_active(&self) -> bool {
        self.matcher.is_some()
    }
}

// ---------------------------------------------------------------------------
// Chain construction
// ---------------------------------------------------------------------------

/// Which filters the operator switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSettings {
    /// Retention window in days; `<= 0` disables it.
    pub days: i64,
    /// Explicit source allow-list; supersedes `deny_sources` when non-empty.
    pub allow: Vec<String>,
    pub deny_sources: bool,
    pub filter_agents: bool,
}

/// Build the full chain in its canonical order: date, source, agent,
/// referrer. Disabled filters are included as pass-through stages.
pub fn build_chain(
    settings: &FilterSettings,
    lists: &FilterConfig,
) -> Result<Vec<Box<dyn RecordFilter>>, ConfigError> {
    let chain: Vec<Box<dyn RecordFilter>> = vec![
        Box::new(DateWindow::new(settings.days)),
        Box::new(SourceFilter::new(
            &settings.allow,
            settings.deny_sources,
            &lists.denied_sources,
        )),
        Box::new(AgentFilter::new(settings.filter_agents, &lists.agents)?),
        Box::new(ReferrerFilter::new(&lists.referrers)?),
    ];

    for filter in &chain {
        tracing::debug!(filter = filter.name(), active = filter.is_active(), "Filter ready");
    }
    Ok(chain)
}

// ---------------------------------------------------------------------------
// Pipeline stage
// ---------------------------------------------------------------------------

/// Filter stage: forward records `filter` keeps, return how many it dropped.
pub async fn filter_stage(
    filter: Box<dyn RecordFilter>,
    mut rx: mpsc::Receiver<NormalizedRecord>,
    tx: mpsc::Sender<NormalizedRecord>,
) -> u64 {
    let mut dropped = 0;
    while let Some(record) = rx.recv().await {
        if filter.rejects(&record) {
            dropped += 1;
            continue;
        }
        if tx.send(record).await.is_err() {
            tracing::debug!(filter = filter.name(), "Filter output closed; stopping early");
            break;
        }
    }
    dropped
}
