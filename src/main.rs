//! ctstore - unified CLI entrypoint.
//!
//! Usage:
//!   ctstore config validate --config config/ctstore.toml
//!   ctstore config show --format json
//!   ctstore keys --leaf <contents> [--seq N]
//!   ctstore simulate [--submitters N] [--entries N]

use anyhow::Result;
use clap::Parser;
use ctstore::cli::commands::{load_config, run_config, run_keys, run_simulate};
use ctstore::cli::{Cli, Commands};
use ctstore::config::ConfigOverrides;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine config path - use global --config or default
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config/ctstore.toml"));

    let overrides = ConfigOverrides {
        log_level: cli.log_level,
        node_id: cli.node_id,
    };
    let config = load_config(&config_path, &overrides)?;
    ctstore::telemetry::init_tracing(&config.telemetry.log_level);

    match cli.command {
        Commands::Config(args) => run_config(args, &config),
        Commands::Keys(args) => run_keys(args, &config),
        Commands::Simulate(args) => run_simulate(args, &config).await,
    }
}
