//! Configuration settings for athena.
//!
//! Settings are loaded from `~/.athena/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::AthenaError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Backend API settings.
    pub api: ApiConfig,
    /// Offline queue settings.
    pub queue: QueueConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the analysis backend, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Offline queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Key under which the serialized queue is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Retry bound applied to actions queued by the CLI.
    #[serde(default = "default_max_retries")]
    pub default_max_retries: Option<u32>,
    /// Upper bound on a single processor call. `0` disables the bound.
    #[serde(default = "default_processor_timeout_secs")]
    pub processor_timeout_secs: u64,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_storage_key() -> String {
    "@Athena:offlineQueue".to_string()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_retries() -> Option<u32> {
    Some(5)
}

const fn default_processor_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_max_retries: default_max_retries(),
            processor_timeout_secs: default_processor_timeout_secs(),
        }
    }
}

impl QueueConfig {
    /// Processor timeout, or `None` when disabled.
    #[must_use]
    pub const fn processor_timeout(&self) -> Option<Duration> {
        if self.processor_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.processor_timeout_secs))
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, AthenaError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, AthenaError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AthenaError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AthenaError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), AthenaError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| AthenaError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            AthenaError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
