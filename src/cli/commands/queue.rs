//! Queue command implementation.
//!
//! Handles the queue subcommands for inspecting and draining the offline queue.

use serde_json::Value;

use crate::cli::args::{OutputFormat, QueueCommands};
use crate::cli::Session;
use crate::error::AthenaError;
use crate::offline::NewAction;
use crate::output::{format_queue, format_queued, format_stats, format_summary, to_json};

/// Execute queue subcommands.
///
/// # Errors
///
/// Returns an error on invalid input or if output formatting fails.
pub async fn queue(
    session: &Session,
    cmd: QueueCommands,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match cmd {
        QueueCommands::Status => {
            let stats = session.manager.stats().await;
            format_stats(&stats, format)
        }
        QueueCommands::List { limit } => {
            let mut actions = session.manager.get_queue().await;
            let total = actions.len();
            if let Some(limit) = limit {
                actions.truncate(limit);
            }
            format_queue(&actions, total, format)
        }
        QueueCommands::Add {
            kind,
            payload,
            max_retries,
        } => add(session, &kind, &payload, max_retries, format).await,
        QueueCommands::Run => {
            let summary = session.deliver().await;
            format_summary(summary.as_ref(), format)
        }
        QueueCommands::Clear { force } => clear(session, force, format).await,
    }
}

async fn add(
    session: &Session,
    kind: &str,
    payload: &str,
    max_retries: Option<u32>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    if kind.trim().is_empty() {
        return Err(AthenaError::InvalidInput(
            "Action type must not be empty".to_string(),
        ));
    }

    let payload: Value = serde_json::from_str(payload)
        .map_err(|e| AthenaError::InvalidInput(format!("Invalid payload JSON: {e}")))?;

    let action = NewAction::new(kind, payload)
        .with_max_retries(max_retries.or(session.config.queue.default_max_retries));
    let id = session.manager.queue_action(action).await;

    format_queued(id, kind, true, None, None, format)
}

async fn clear(session: &Session, force: bool, format: OutputFormat) -> Result<String, AthenaError> {
    if !force {
        return Err(AthenaError::InvalidInput(
            "Refusing to clear the queue without --force".to_string(),
        ));
    }

    let removed = session.manager.len().await;
    session.manager.clear_queue().await;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "cleared": removed })),
        OutputFormat::Pretty => Ok(format!("Cleared {removed} queued actions")),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::cli::load_config;

    async fn offline_session(dir: &TempDir) -> Session {
        let (paths, config) = load_config(Some(dir.path().to_path_buf()), None).unwrap();
        Session::open(&paths, config, true).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let session = offline_session(&dir).await;

        queue(
            &session,
            QueueCommands::Add {
                kind: "analyze".to_string(),
                payload: r#"{"content": "claim"}"#.to_string(),
                max_retries: Some(2),
            },
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let listed = queue(&session, QueueCommands::List { limit: None }, OutputFormat::Json)
            .await
            .unwrap();
        assert!(listed.contains("\"count\": 1"));
        assert!(listed.contains("\"maxRetries\": 2"));
    }

    #[tokio::test]
    async fn test_add_uses_configured_default_retries() {
        let dir = TempDir::new().unwrap();
        let session = offline_session(&dir).await;

        queue(
            &session,
            QueueCommands::Add {
                kind: "ping".to_string(),
                payload: "{}".to_string(),
                max_retries: None,
            },
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let actions = session.manager.get_queue().await;
        assert_eq!(actions[0].max_retries, Some(5));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_payload() {
        let dir = TempDir::new().unwrap();
        let session = offline_session(&dir).await;

        let result = queue(
            &session,
            QueueCommands::Add {
                kind: "analyze".to_string(),
                payload: "{not json".to_string(),
                max_retries: None,
            },
            OutputFormat::Pretty,
        )
        .await;

        assert!(matches!(result, Err(AthenaError::InvalidInput(_))));
        assert!(session.manager.is_empty().await);
    }

    #[tokio::test]
    async fn test_run_offline_is_noop() {
        let dir = TempDir::new().unwrap();
        let session = offline_session(&dir).await;

        let result = queue(&session, QueueCommands::Run, OutputFormat::Json)
            .await
            .unwrap();
        assert!(result.contains("\"ran\": false"));
    }

    #[tokio::test]
    async fn test_clear_requires_force() {
        let dir = TempDir::new().unwrap();
        let session = offline_session(&dir).await;

        let result = queue(&session, QueueCommands::Clear { force: false }, OutputFormat::Pretty).await;
        assert!(result.is_err());

        let result = queue(&session, QueueCommands::Clear { force: true }, OutputFormat::Json)
            .await
            .unwrap();
        assert!(result.contains("\"cleared\": 0"));
    }
}
