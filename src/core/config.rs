//! Configuration parsing and validation.
//!
//! Configuration is loaded from TOML files with CLI overrides.

use crate::ops::telemetry::LOG_LEVELS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store keyspace and node identity.
    pub store: StoreConfig,

    /// Coordination service configuration.
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Store keyspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root path under which all store keys live (e.g. "/ct").
    #[serde(default = "default_root")]
    pub root: String,

    /// Stable identifier of this node; keys its node-state record.
    pub node_id: String,
}

/// Coordination service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Backend: only "memory" (in-process service) is bundled.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Depth of the dispatch loop's request queue.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            queue_depth: default_queue_depth(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_root() -> String {
    "/ct".to_string()
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_queue_depth() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
        if let Some(ref node_id) = overrides.node_id {
            self.store.node_id = node_id.clone();
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_store()?;
        self.validate_coordinator()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_store(&self) -> Result<()> {
        let root = &self.store.root;
        if !root.starts_with('/') {
            anyhow::bail!("store.root must be an absolute path, got: {}", root);
        }
        if root.len() > 1 && root.ends_with('/') {
            anyhow::bail!("store.root must not end with '/', got: {}", root);
        }

        if self.store.node_id.is_empty() {
            anyhow::bail!("store.node_id must not be empty");
        }
        if self.store.node_id.contains('/') {
            anyhow::bail!(
                "store.node_id must be a single path segment, got: {}",
                self.store.node_id
            );
        }
        Ok(())
    }

    fn validate_coordinator(&self) -> Result<()> {
        if self.coordinator.backend != "memory" {
            anyhow::bail!(
                "coordinator.backend must be 'memory', got: {}",
                self.coordinator.backend
            );
        }
        if self.coordinator.queue_depth == 0 {
            anyhow::bail!("coordinator.queue_depth must be > 0");
        }
        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                LOG_LEVELS,
                self.telemetry.log_level
            );
        }
        Ok(())
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override log level.
    pub log_level: Option<String>,
    /// Override node identifier.
    pub node_id: Option<String>,
}
