//! Action processor seam.
//!
//! A processor knows how to deliver one queued action. The queue only
//! cares whether delivery succeeded.

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

use super::action::QueuedAction;

/// Reason a processor gave up on an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProcessError(pub String);

impl ProcessError {
    /// Create an error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<crate::error::AthenaError> for ProcessError {
    fn from(err: crate::error::AthenaError) -> Self {
        Self(err.to_string())
    }
}

/// Delivers queued actions.
///
/// `Ok(true)` means delivered. `Ok(false)` and `Err(_)` are both treated
/// as a failed attempt.
#[async_trait]
pub trait ActionProcessor: Send + Sync {
    /// Attempt delivery of one action.
    async fn process(&self, action: &QueuedAction) -> Result<bool, ProcessError>;
}

/// Adapts an async closure into an [`ActionProcessor`].
///
/// The closure receives an owned copy of the action.
pub struct FnProcessor<F> {
    f: F,
}

impl<F, Fut> FnProcessor<F>
where
    F: Fn(QueuedAction) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, ProcessError>> + Send + 'static,
{
    /// Wrap `f`.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ActionProcessor for FnProcessor<F>
where
    F: Fn(QueuedAction) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, ProcessError>> + Send + 'static,
{
    async fn process(&self, action: &QueuedAction) -> Result<bool, ProcessError> {
        (self.f)(action.clone()).await
    }
}
