//! Test builders: ergonomic constructors for records and filter chains.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, TimeZone, Utc};
use nlogx_core::{FilterConfig, NormalizedRecord};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`NormalizedRecord`] test fixtures.
///
/// ```rust
/// let record = RecordBuilder::new("10.0.0.1")
///     .agent("curl/8.0")
///     .status(404)
///     .build();
/// ```
pub struct RecordBuilder {
    record: NormalizedRecord,
}

impl RecordBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            record: NormalizedRecord {
                source: source.into(),
                time: reference_time(),
                method: "GET".to_string(),
                path: "/".to_string(),
                version: 1,
                status: 200,
                referrer: "-".to_string(),
                agent: "Mozilla/5.0".to_string(),
            },
        }
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.record.time = time;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.record.path = path.into();
        self
    }

    pub fn status(mut self, status: i32) -> Self {
        self.record.status = status;
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.record.referrer = referrer.into();
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.record.agent = agent.into();
        self
    }

    pub fn build(self) -> NormalizedRecord {
        self.record
    }
}

/// 2020-05-13 20:15:43 UTC, the time of [`LINE_REDIRECT`](super::LINE_REDIRECT).
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 13, 20, 15, 43).unwrap()
}

// ---------------------------------------------------------------------------
// Filter lists
// ---------------------------------------------------------------------------

/// Small, readable lists for tests that should not depend on the built-ins.
pub fn fixture_lists() -> FilterConfig {
    FilterConfig {
        agents: vec!["^curl".into(), "bot".into(), "python-requests".into()],
        referrers: vec![r"spam\.example".into()],
        denied_sources: vec!["127.0.0.1".into()],
    }
}

// ---------------------------------------------------------------------------
// Run settings
// ---------------------------------------------------------------------------

/// Settings with every optional filter off, fixture lists and UTC output so
/// rendered datetimes do not depend on the machine's zone.
pub fn settings(format: nlogx_render::Format) -> nlogx::Settings {
    nlogx::Settings {
        format,
        clock: nlogx_render::Clock::Utc,
        filters: nlogx_core::FilterSettings::default(),
        lists: fixture_lists(),
    }
}

/// Run `text` through [`nlogx::run`] and return the report and the output.
pub async fn run_text(
    settings: &nlogx::Settings,
    text: impl Into<String>,
) -> (nlogx_core::PipelineReport, String) {
    let input = std::io::Cursor::new(text.into().into_bytes());
    let mut out = Vec::new();
    let report = nlogx::run(settings, input, &mut out).await.unwrap();
    (report, String::from_utf8(out).unwrap())
}
