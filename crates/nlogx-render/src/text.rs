//! Plain-text renderers.

use std::io::{self, Write};

use nlogx_core::NormalizedRecord;

use crate::{Clock, Render};

/// Human output width when neither `--width` nor `COLUMNS` is set.
pub const DEFAULT_WIDTH: usize = 200;
/// Narrowest human output; leaves the agent column 15 characters.
pub const MIN_WIDTH: usize = 160;

// Columns before the agent: 15 + 1 + 19 + 1 + 3 + 1 + 60 + 2 + 40 + 2, plus
// one for the trailing newline.
const FIXED_COLUMNS: usize = 145;

pub fn clamp_width(width: usize) -> usize {
    width.max(MIN_WIDTH)
}

/// `src datetime status path referrer "agent"`, space separated.
#[derive(Debug, Clone)]
pub struct DelimitedRenderer {
    clock: Clock,
}

impl DelimitedRenderer {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

impl Render for DelimitedRenderer {
    fn render(&mut self, out: &mut dyn Write, r: &NormalizedRecord) -> io::Result<()> {
        writeln!(
            out,
            "{} {} {} {} {} {:?}",
            r.source,
            self.clock.format(&r.time),
            r.status,
            r.path,
            r.referrer,
            r.agent
        )
    }
}

/// Fixed-width columns; path and referrer are cut to their column, the
/// agent to whatever width remains.
#[derive(Debug, Clone)]
pub struct HumanRenderer {
    clock: Clock,
    agent_width: usize,
}

impl HumanRenderer {
    /// `width` is clamped to [`MIN_WIDTH`].
    pub fn new(clock: Clock, width: usize) -> Self {
        Self {
            clock,
            agent_width: clamp_width(width) - FIXED_COLUMNS,
        }
    }
}

impl Render for HumanRenderer {
    fn render(&mut self, out: &mut dyn Write, r: &NormalizedRecord) -> io::Result<()> {
        writeln!(
            out,
            "{:<15} {:<19} {:<3} {:<60.60}  {:<40.40}  {:.agent$}",
            r.source,
            self.clock.format(&r.time),
            r.status,
            r.path,
            r.referrer,
            r.agent,
            agent = self.agent_width
        )
    }
}
