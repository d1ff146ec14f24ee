//! Crypto signal and memory engine CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use crypto_config::load_config;
use crypto_monitor::setup_logging_with_file;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    config.validate().context("Invalid configuration")?;

    // Setup logging
    let log_level = cli
        .log_level
        .as_ref()
        .map(|l| l.as_str())
        .unwrap_or(config.logging.level.as_str());
    let json = cli.json_logs || config.logging.is_json();
    let log_file = config.logging.file.as_deref().map(Path::new);
    let _guard = setup_logging_with_file(log_level, json, log_file)
        .context("Failed to initialize logging")?;

    // Execute command
    match cli.command {
        Commands::Evaluate(args) => cli::commands::evaluate::run(args, &config).await,
        Commands::Size(args) => cli::commands::size::run(args, &config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
