//! Configuration management for athena.
//!
//! This module handles loading and saving configuration from `~/.athena/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ApiConfig, Config, LoggingConfig, QueueConfig};
