//! Configuration management for the isolation layer
//!
//! Handles configuration loading (TOML or JSON), environment overrides,
//! and logging settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::module::traits::LookupStrategy;
use crate::utils::env::env_opt;

/// Overrides `descriptors_dir`
pub const DESCRIPTORS_DIR_ENV: &str = "ARTIFACT_ISOLATION_DESCRIPTORS_DIR";
/// Overrides `default_strategy` (`local` / `delegate`)
pub const DEFAULT_STRATEGY_ENV: &str = "ARTIFACT_ISOLATION_DEFAULT_STRATEGY";

/// Isolation layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolationConfig {
    /// Strategy for names no override covers, unless a descriptor names its own
    #[serde(default)]
    pub default_strategy: LookupStrategy,

    /// Fail module construction when a pattern is both local and blocked.
    /// When false the pattern is logged and dropped from both sets.
    #[serde(default = "default_true")]
    pub reject_ambiguous_overrides: bool,

    /// Skip discovered descriptors that fail validation
    #[serde(default = "default_true")]
    pub strict_validation: bool,

    /// Directory containing one subdirectory per artifact
    #[serde(default = "default_descriptors_dir")]
    pub descriptors_dir: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_true() -> bool {
    true
}

fn default_descriptors_dir() -> String {
    "artifacts".to_string()
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            default_strategy: LookupStrategy::Delegate,
            reject_ambiguous_overrides: true,
            strict_validation: true,
            descriptors_dir: default_descriptors_dir(),
            logging: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "artifact_isolation=debug"); RUST_LOG wins
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

impl IsolationConfig {
    /// Load configuration from a file; `.json` is JSON, anything else TOML
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IsolationConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        debug!("Loaded isolation config from {:?}", path);
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IsolationConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `ARTIFACT_ISOLATION_*` environment overrides
    pub fn apply_env_overrides(mut self) -> anyhow::Result<Self> {
        if let Some(dir) = env_opt(DESCRIPTORS_DIR_ENV) {
            self.descriptors_dir = dir;
        }
        if let Some(strategy) = env_opt(DEFAULT_STRATEGY_ENV) {
            self.default_strategy = strategy.parse()?;
        }
        Ok(self)
    }
}
