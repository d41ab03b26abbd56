//! Field scanner: splits combined-format lines into [`RawRecord`] values.
//!
//! A combined-format line mixes three quoting conventions: bare tokens, a
//! `[...]` timestamp and `"..."` request/referrer/agent fields. The scanner
//! is a four-state machine fed one character at a time:
//!
//! | State     | Accumulates         | Field ends on | Next                                           |
//! |-----------|---------------------|---------------|------------------------------------------------|
//! | `Begin`   | nothing (skips ` `) | n/a           | `[` → `Bracket`, `"` → `Quote`, other → `Bare` |
//! | `Bare`    | any char            | ` `           | `Begin`                                        |
//! | `Quote`   | any char            | `"`           | `Begin`                                        |
//! | `Bracket` | any char            | `]`           | `Begin`                                        |
//!
//! A newline in any state closes the pending field and the line. An open
//! quote or bracket at a newline is not an error: the field ends there. A
//! line yields a record only when it delimited exactly
//! [`FIELD_COUNT`](crate::types::FIELD_COUNT) fields; anything else is
//! counted and dropped.
//!
//! Input is read one line at a time into a reused buffer and decoded as
//! lossy UTF-8 before being fed to the machine, so memory stays bounded by
//! the longest line.

use std::io::BufRead;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::error::ScanError;
use crate::types::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Begin,
    Bare,
    Quote,
    Bracket,
}

/// Per-run scanner counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Lines that delimited at least one field.
    pub lines: u64,
    /// Lines dropped because they did not delimit exactly nine fields.
    pub skipped: u64,
}

/// Character-level state machine. Push characters in, records come out.
#[derive(Debug)]
pub struct FieldScanner {
    step: Step,
    token: String,
    fields: Vec<String>,
    stats: ScanStats,
}

impl Default for FieldScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldScanner {
    pub fn new() -> Self {
        Self {
            step: Step::Begin,
            token: String::new(),
            fields: Vec::with_capacity(crate::types::FIELD_COUNT),
            stats: ScanStats::default(),
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Advance the machine by one character. Returns a record when `ch` is
    /// the newline that completes a nine-field line.
    pub fn push(&mut self, ch: char) -> Option<RawRecord> {
        match self.step {
            Step::Begin => match ch {
                ' ' => None,
                '[' => {
                    self.step = Step::Bracket;
                    None
                }
                '"' => {
                    self.step = Step::Quote;
                    None
                }
                '\n' => self.end_of_line(),
                _ => {
                    self.token.push(ch);
                    self.step = Step::Bare;
                    None
                }
            },
            Step::Bare => self.inside_field(ch, ' '),
            Step::Quote => self.inside_field(ch, '"'),
            Step::Bracket => self.inside_field(ch, ']'),
        }
    }

    /// Flush the pending field and line at end of input, exactly as a newline
    /// would. A final line without its trailing newline is not lost.
    pub fn finish(&mut self) -> Option<RawRecord> {
        if !self.token.is_empty() {
            self.end_of_token();
        }
        self.step = Step::Begin;
        self.end_of_line()
    }

    /// Feed one chunk of input bytes, decoded lossily. The chunk must not
    /// contain more than one newline, which holds for `read_until(b'\n')`.
    pub fn push_line(&mut self, bytes: &[u8]) -> Option<RawRecord> {
        let mut record = None;
        for ch in String::from_utf8_lossy(bytes).chars() {
            if let Some(r) = self.push(ch) {
                record = Some(r);
            }
        }
        record
    }

    fn inside_field(&mut self, ch: char, closing: char) -> Option<RawRecord> {
        if ch == closing {
            self.end_of_token();
            self.step = Step::Begin;
            None
        } else if ch == '\n' {
            self.end_of_token();
            self.step = Step::Begin;
            self.end_of_line()
        } else {
            self.token.push(ch);
            None
        }
    }

    fn end_of_token(&mut self) {
        self.fields.push(std::mem::take(&mut self.token));
    }

    fn end_of_line(&mut self) -> Option<RawRecord> {
        if self.fields.is_empty() {
            return None;
        }
        self.stats.lines += 1;
        let fields = std::mem::replace(
            &mut self.fields,
            Vec::with_capacity(crate::types::FIELD_COUNT),
        );
        match RawRecord::try_from(fields) {
            Ok(record) => Some(record),
            Err(fields) => {
                self.stats.skipped += 1;
                tracing::debug!(
                    line = self.stats.lines,
                    fields = fields.len(),
                    "Skipping line with unexpected field count"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Blocking iterator
// ---------------------------------------------------------------------------

/// Lazy iterator of raw records over a blocking reader.
///
/// Yields `Err` once on a read failure and then ends.
pub struct RawRecords<R> {
    reader: R,
    scanner: FieldScanner,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> RawRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            scanner: FieldScanner::new(),
            buf: Vec::new(),
            done: false,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }
}

impl<R: BufRead> Iterator for RawRecords<R> {
    type Item = Result<RawRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return self.scanner.finish().map(Ok);
                }
                Ok(_) => {
                    if let Some(record) = self.scanner.push_line(&self.buf) {
                        return Some(Ok(record));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(ScanError::Read(e)));
                }
            }
        }
        None
    }
}

/// Scan a blocking reader.
pub fn scan<R: BufRead>(reader: R) -> RawRecords<R> {
    RawRecords::new(reader)
}

// ---------------------------------------------------------------------------
// Pipeline stage
// ---------------------------------------------------------------------------

/// Scanner stage: read `reader` to the end, sending every record downstream.
///
/// Returns early without error if the downstream receiver is gone. A read
/// failure ends the scan with [`ScanError`]; dropping `tx` on return closes
/// the queue either way.
pub async fn scan_stage<R>(
    mut reader: R,
    tx: mpsc::Sender<RawRecord>,
) -> Result<ScanStats, ScanError>
where
    R: AsyncBufRead + Unpin,
{
    let mut scanner = FieldScanner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = match reader.read_until(b'\n', &mut buf).await {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // A partial line is dropped, not flushed.
                tracing::error!(error = %e, "Read error");
                return Err(ScanError::Read(e));
            }
        };

        let record = if n == 0 {
            scanner.finish()
        } else {
            scanner.push_line(&buf)
        };

        if let Some(record) = record {
            if tx.send(record).await.is_err() {
                tracing::debug!("Scanner output closed; stopping early");
                return Ok(scanner.stats());
            }
        }

        if n == 0 {
            return Ok(scanner.stats());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
