//! nlogx: filter and reformat combined-format access logs.
//!
//! The binary is a thin shell around [`run`], which wires the core pipeline
//! to a renderer. Integration tests drive [`run`] directly with in-memory
//! readers and writers.
//!
//! # Architecture
//!
//! ```text
//! input ──► Scanner ──► Normalizer ──► Filters ──► Renderer ──► output
//!           └──────────── nlogx-core ───────────┘  nlogx-render
//! ```
//!
//! Stages run as tokio tasks joined by bounded channels; rendering happens on
//! the calling task.

pub mod cli;
pub mod logging;

use std::io::{ErrorKind, Write};

use tokio::io::AsyncRead;

use nlogx_core::{build_chain, FilterConfig, FilterSettings, Pipeline, PipelineReport};
use nlogx_render::{Clock, Format};

/// Everything a run needs besides its input and output.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: Format,
    pub clock: Clock,
    pub filters: FilterSettings,
    pub lists: FilterConfig,
}

/// Stream `input` through the pipeline and render survivors into `out`.
///
/// Filter construction errors are returned before any input is read. A
/// closed output (broken pipe) ends the run early without error.
pub async fn run<R, W>(settings: &Settings, input: R, mut out: W) -> anyhow::Result<PipelineReport>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: Write,
{
    let chain = build_chain(&settings.filters, &settings.lists)?;
    let mut renderer = nlogx_render::renderer(settings.format, settings.clock);
    let mut running = Pipeline::new(chain).spawn(input);

    while let Some(record) = running.recv().await {
        if let Err(e) = renderer.render(&mut out, &record) {
            if e.kind() == ErrorKind::BrokenPipe {
                tracing::debug!("Output closed; stopping");
                break;
            }
            return Err(e.into());
        }
    }

    match out.flush() {
        Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
        _ => {}
    }

    let report = running.finish().await?;
    report.log_summary();
    Ok(report)
}
