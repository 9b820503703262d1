//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

/// ctstore - consistent store for certificate-transparency log state.
#[derive(Parser, Debug)]
#[command(name = "ctstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override the configured node identifier.
    #[arg(long, global = true)]
    pub node_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration operations.
    Config(commands::ConfigArgs),
    /// Print the keys an entry maps to.
    Keys(commands::KeysArgs),
    /// Run submitters and a sequencer against an in-process coordinator.
    Simulate(commands::SimulateArgs),
}
