use std::io::{self, BufWriter};

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncRead;

use nlogx::cli::Cli;
use nlogx::Settings;
use nlogx_core::FilterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    nlogx::logging::init_logging(cli.verbose);

    let settings = Settings {
        format: cli.format(),
        clock: cli.clock(),
        filters: cli.filter_settings(),
        lists: FilterConfig::load(cli.filters.as_deref())?,
    };

    let input: Box<dyn AsyncRead + Unpin + Send> = match cli.input_path() {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let stdout = io::stdout().lock();
    nlogx::run(&settings, input, BufWriter::new(stdout)).await?;
    Ok(())
}
