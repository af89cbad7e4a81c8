//! Command-line interface.

pub mod args;
pub mod commands;
pub mod session;

pub use session::{load_config, Session};
