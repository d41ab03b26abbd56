//! nlogx-render: output renderers for the filtered record stream.
//!
//! Three formats are available, selected by [`Format`]:
//!
//! | Format      | Shape                                                     |
//! |-------------|-----------------------------------------------------------|
//! | `Delimited` | `src datetime status path referrer "agent"`               |
//! | `Human`     | same fields in fixed-width columns, agent cut to fit      |
//! | `Json`      | one JSON object per line                                  |
//!
//! Renderers write to any [`std::io::Write`]; callers own buffering and
//! flushing.

mod json;
mod text;

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use nlogx_core::NormalizedRecord;

pub use json::JsonRenderer;
pub use text::{clamp_width, DelimitedRenderer, HumanRenderer, DEFAULT_WIDTH, MIN_WIDTH};

/// Datetime layout for both text renderers.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes one record per call.
pub trait Render {
    fn render(&mut self, out: &mut dyn Write, record: &NormalizedRecord) -> io::Result<()>;
}

/// Output format chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Delimited,
    /// Aligned columns for a terminal `width` characters wide.
    Human { width: usize },
    Json,
}

/// Zone in which text renderers display datetimes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    pub fn format(&self, time: &DateTime<Utc>) -> String {
        match self {
            Clock::Local => time.with_timezone(&Local).format(DATETIME_FORMAT).to_string(),
            Clock::Utc => time.format(DATETIME_FORMAT).to_string(),
        }
    }
}

/// Build the renderer for `format`.
pub fn renderer(format: Format, clock: Clock) -> Box<dyn Render + Send> {
    match format {
        Format::Delimited => Box::new(DelimitedRenderer::new(clock)),
        Format::Human { width } => Box::new(HumanRenderer::new(clock, width)),
        Format::Json => Box::new(JsonRenderer),
    }
}
