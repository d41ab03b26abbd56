//! JSON-lines renderer.

use std::io::{self, Write};

use nlogx_core::NormalizedRecord;

use crate::Render;

/// One compact JSON object per line, keys in [`NormalizedRecord`] order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Render for JsonRenderer {
    fn render(&mut self, out: &mut dyn Write, record: &NormalizedRecord) -> io::Result<()> {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")
    }
}
