//! Queued action records.
//!
//! Defines the action a caller submits and the record the queue keeps
//! for it, along with the blob encoding of the whole queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AthenaError;

/// An action waiting to be delivered to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// Unique identifier assigned at enqueue time.
    pub id: Uuid,
    /// Caller-defined tag naming what kind of action this is.
    #[serde(rename = "type")]
    pub kind: String,
    /// Caller-defined data, opaque to the queue.
    pub payload: Value,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Failed processing attempts so far.
    pub retry_count: u32,
    /// Retries allowed after the first attempt before the action is dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl QueuedAction {
    /// Build the queued record for a new action.
    #[must_use]
    pub fn from_new(action: NewAction) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: action.kind,
            payload: action.payload,
            timestamp: Utc::now(),
            retry_count: 0,
            max_retries: action.max_retries,
        }
    }

    /// Record a failed attempt.
    ///
    /// Returns `true` when the action has used up its retries and must be
    /// dropped. An action with `max_retries = n` is attempted once and
    /// then retried at most `n` times.
    pub fn record_failure(&mut self) -> bool {
        self.retry_count = self.retry_count.saturating_add(1);
        self.is_exhausted()
    }

    /// Whether every allowed retry has failed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.max_retries.is_some_and(|max| self.retry_count > max)
    }
}

/// An action as submitted by a caller, before the queue assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAction {
    /// Caller-defined tag.
    pub kind: String,
    /// Caller-defined data.
    pub payload: Value,
    /// Optional retry bound.
    pub max_retries: Option<u32>,
}

impl NewAction {
    /// Create an action with no retry bound.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            max_retries: None,
        }
    }

    /// Set the retry bound.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Encode the queue as the persisted blob.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_queue(actions: &[QueuedAction]) -> Result<String, AthenaError> {
    Ok(serde_json::to_string(actions)?)
}

/// Decode a persisted blob back into the queue.
///
/// # Errors
///
/// Returns an error if the blob is not a valid encoded queue.
pub fn decode_queue(blob: &str) -> Result<Vec<QueuedAction>, AthenaError> {
    Ok(serde_json::from_str(blob)?)
}
