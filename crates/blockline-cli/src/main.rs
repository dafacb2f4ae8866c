//! Blockline CLI
//!
//! Runs the linearization pipeline described by a key=value config file:
//!
//! ```text
//! blockline linearize.cfg
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blockline::{Config, Linearizer};

/// Linearize block segment files into canonical chain order.
#[derive(Parser)]
#[command(name = "blockline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the key=value config file
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    init_tracing(cli.verbose || config.verbose);

    let report = Linearizer::new(config).run()?;
    info!(
        blocks = report.blocks_written,
        bytes = report.bytes_written,
        segments = report.segments_opened,
        "done"
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
