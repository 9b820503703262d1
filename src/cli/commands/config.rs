//! Config command implementation.

use crate::core::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};

/// Configuration operations.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print configuration with defaults filled in.
    Show {
        /// Output format (toml, json).
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

/// Run the config command against an already loaded configuration.
pub fn run_config(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.command {
        ConfigCommand::Validate => {
            println!("✓ configuration is valid");
            println!("  root:    {}", config.store.root);
            println!("  node_id: {}", config.store.node_id);
            Ok(())
        }
        ConfigCommand::Show { format } => show_config(config, &format),
    }
}

fn show_config(config: &Config, format: &str) -> Result<()> {
    let rendered = match format {
        "toml" => toml::to_string_pretty(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        other => anyhow::bail!("unsupported format: {} (expected toml or json)", other),
    };
    println!("{}", rendered);
    Ok(())
}
