//! CLI command implementations.

mod config;
mod keys;
mod simulate;

pub use config::{run_config, ConfigArgs};
pub use keys::{run_keys, KeysArgs};
pub use simulate::{run_simulate, simulate, SimulateArgs, SimulationReport};

use crate::core::config::{Config, ConfigOverrides};
use anyhow::{Context, Result};
use std::path::Path;

/// Load, override and re-validate configuration.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = Config::from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.apply_overrides(overrides);
    config.validate().context("invalid configuration after overrides")?;
    Ok(config)
}
