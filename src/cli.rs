//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use nlogx_core::FilterSettings;
use nlogx_render::{clamp_width, Clock, Format, DEFAULT_WIDTH};

#[derive(Debug, Parser)]
#[command(
    name = "nlogx",
    version,
    about = "Filter and reformat combined-format access logs"
)]
pub struct Cli {
    /// Increase the verbosity level (diagnostics go to stderr).
    #[arg(short, long)]
    pub verbose: bool,

    /// Display a human-readable, column-aligned output.
    #[arg(short = 'H', long, conflicts_with = "json")]
    pub human: bool,

    /// Dump JSON records, one per line.
    #[arg(short, long)]
    pub json: bool,

    /// Filter out automated user agents.
    #[arg(short = 'A', long)]
    pub agent: bool,

    /// Filter out well-known sources.
    #[arg(short, long)]
    pub source: bool,

    /// Restrict to a time window, in days (0 disables).
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub days: i64,

    /// Only display records from these explicit sources.
    #[arg(short = 'x', long = "addr", value_name = "ADDR", value_delimiter = ',')]
    pub addr: Vec<String>,

    /// Width of the human-readable output [default: $COLUMNS, else 200].
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Display datetimes in UTC instead of local time.
    #[arg(long)]
    pub utc: bool,

    /// TOML file overriding the built-in agent, referrer and source lists.
    #[arg(long, value_name = "PATH")]
    pub filters: Option<PathBuf>,

    /// Access log to read; standard input when absent or `-`.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

impl Cli {
    pub fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.human {
            let columns = std::env::var("COLUMNS").ok();
            Format::Human {
                width: human_width(self.width, columns.as_deref()),
            }
        } else {
            Format::Delimited
        }
    }

    pub fn clock(&self) -> Clock {
        if self.utc {
            Clock::Utc
        } else {
            Clock::Local
        }
    }

    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            days: self.days,
            allow: self.addr.clone(),
            deny_sources: self.source,
            filter_agents: self.agent,
        }
    }

    /// `None` means standard input.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

/// `--width` wins, then a numeric `COLUMNS`, then [`DEFAULT_WIDTH`]. A
/// `COLUMNS` that is not a number is ignored.
pub fn human_width(flag: Option<usize>, columns: Option<&str>) -> usize {
    let width = flag
        .or_else(|| columns.and_then(|c| c.trim().parse().ok()))
        .unwrap_or(DEFAULT_WIDTH);
    clamp_width(width)
}
