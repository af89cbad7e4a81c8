//! Command implementations for athena.

mod analyses;
mod queue;

pub use analyses::{history, learn, show};
pub use queue::queue;

use crate::backend::{analyze_action, feedback_action};
use crate::cli::args::{AnalyzeArgs, FeedbackArgs, OutputFormat};
use crate::cli::Session;
use crate::error::AthenaError;
use crate::offline::NewAction;
use crate::output::format_queued;

/// Execute analyze command
///
/// # Errors
///
/// Returns an error if the content is blank or output formatting fails.
pub async fn analyze(
    session: &Session,
    args: AnalyzeArgs,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    let action = analyze_action(&args.content)?;
    submit(session, action, args.max_retries, format).await
}

/// Execute feedback command
///
/// # Errors
///
/// Returns an error if the analysis id is blank or output formatting fails.
pub async fn feedback(
    session: &Session,
    args: FeedbackArgs,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    let is_correct = args.correct;
    let action = feedback_action(&args.analysis_id, is_correct)?;
    submit(session, action, args.max_retries, format).await
}

/// Queue `action`, then try to deliver the whole queue.
async fn submit(
    session: &Session,
    action: NewAction,
    max_retries: Option<u32>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    let kind = action.kind.clone();
    let action =
        action.with_max_retries(max_retries.or(session.config.queue.default_max_retries));

    let id = session.manager.queue_action(action).await;
    let summary = session.deliver().await;
    let pending = session
        .manager
        .get_queue()
        .await
        .iter()
        .any(|queued| queued.id == id);
    let analysis = session
        .take_analyses()
        .await
        .into_iter()
        .find(|delivered| delivered.action_id == id)
        .map(|delivered| delivered.result);

    format_queued(id, &kind, pending, summary.as_ref(), analysis.as_ref(), format)
}
