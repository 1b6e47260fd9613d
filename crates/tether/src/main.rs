//! Tether - Entry Point
//!
//! Binary entry point; commands live in [`tether::cli`].

use clap::Parser;
use tether::cli::{Cli, execute, load_config};
use tether::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(config.logging.clone())?;
    execute(&cli.command, &config).await
}
