//! Filter-list configuration for nlogx.
//!
//! The built-in lists (automated-agent patterns, unwanted referrer patterns,
//! denied source addresses) are embedded in the binary as TOML.
//! [`FilterConfig::load`] layers a user file on top of them;
//! [`FilterConfig::builtin`] returns the embedded lists alone. Either way the
//! result is plain data handed to the filter constructors, so tests can build
//! a [`FilterConfig`] literal with fixture lists instead.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_FILTERS: &str = include_str!("defaults/filters.toml");

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Static lists the filters are compiled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
    /// Regex fragments matching automated user agents.
    #[serde(default)]
    pub agents: Vec<String>,
    /// Regex fragments matching unwanted referrers.
    #[serde(default)]
    pub referrers: Vec<String>,
    /// Exact source addresses hidden by the deny filter.
    #[serde(default)]
    pub denied_sources: Vec<String>,
}

impl FilterConfig {
    /// The embedded lists, without touching the filesystem.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_FILTERS,
                config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()?)
    }

    /// Layer a user file over the embedded lists.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_path(), false),
        };
        tracing::debug!(path = %path.display(), required, "Loading filter lists");

        Ok(config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_FILTERS,
                config::FileFormat::Toml,
            ))
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .build()?
            .try_deserialize()?)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn default_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("nlogx")
        .join("filters.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
