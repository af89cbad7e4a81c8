//! athena - misinformation analysis client with an offline action queue
//!
//! Submissions are queued locally, persisted in `SQLite`, and delivered to
//! the analysis backend whenever connectivity allows.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod offline;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::AthenaError;
pub use offline::{NewAction, OfflineManager, QueuedAction};
