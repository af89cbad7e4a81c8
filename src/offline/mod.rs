//! Offline action queue.
//!
//! Actions that must reach the backend are queued here, persisted across
//! restarts, and delivered when the device is online.
//!
//! Features:
//! - FIFO delivery with in-place retries and an optional retry bound
//! - Full-queue persistence after every mutation
//! - Single-flight drain passes triggered by connectivity changes
//! - Optional per-action processor timeout

pub mod action;
pub mod connectivity;
pub mod manager;
pub mod processor;

pub use action::{NewAction, QueuedAction};
pub use connectivity::{AppState, ConnectivityMonitor, ConnectivityState, NetworkStatus};
pub use manager::{DrainSummary, ManagerOptions, OfflineManager, QueueStats};
pub use processor::{ActionProcessor, FnProcessor, ProcessError};
