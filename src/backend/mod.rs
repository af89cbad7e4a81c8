//! Client for the Athena analysis backend.

pub mod client;
pub mod processor;
pub mod types;

pub use client::ApiClient;
pub use processor::{
    analyze_action, feedback_action, BackendProcessor, DeliveredAnalysis, ANALYZE, FEEDBACK,
};
pub use types::*;
