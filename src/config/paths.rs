//! Path resolution for athena configuration and data files.
//!
//! All athena data is stored in `~/.athena/` unless `ATHENA_HOME` is set:
//! - `config.yaml` - Main configuration file
//! - `athena.db` - `SQLite` database holding the offline action queue

use std::path::PathBuf;

use crate::error::AthenaError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "ATHENA_HOME";

/// Paths to athena configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.athena/`
    pub root: PathBuf,
    /// Config file: `~/.athena/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.athena/athena.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `ATHENA_HOME`, falling back to `~/.athena`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `ATHENA_HOME` nor `HOME` is set.
    pub fn new() -> Result<Self, AthenaError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            AthenaError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".athena")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("athena.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), AthenaError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                AthenaError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".athena")))
    }
}
