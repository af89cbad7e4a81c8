//! JSON output formatting for athena.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::{AnalysisResult, EducationalContent};
use crate::error::AthenaError;
use crate::offline::{DrainSummary, QueueStats, QueuedAction};

/// Format a queue snapshot as JSON.
///
/// `total` is the queue length before any `--limit` was applied.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_queue_json(actions: &[QueuedAction], total: usize) -> Result<String, AthenaError> {
    let output = json!({
        "count": actions.len(),
        "total": total,
        "items": actions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format queue statistics as JSON.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_stats_json(stats: &QueueStats) -> Result<String, AthenaError> {
    to_json(stats)
}

/// Format the outcome of a drain request as JSON.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_summary_json(summary: Option<&DrainSummary>) -> Result<String, AthenaError> {
    let output = json!({
        "ran": summary.is_some(),
        "summary": summary
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a newly queued action, plus the drain it triggered if any.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_queued_json(
    id: Uuid,
    kind: &str,
    pending: bool,
    summary: Option<&DrainSummary>,
    analysis: Option<&AnalysisResult>,
) -> Result<String, AthenaError> {
    let output = json!({
        "id": id,
        "type": kind,
        "pending": pending,
        "summary": summary,
        "analysis": analysis
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format previous analyses as JSON.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_analyses_json(results: &[AnalysisResult]) -> Result<String, AthenaError> {
    let output = json!({
        "count": results.len(),
        "items": results
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format educational articles as JSON.
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_education_json(items: &[EducationalContent]) -> Result<String, AthenaError> {
    let output = json!({
        "count": items.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AthenaError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::NewAction;

    fn make_action(kind: &str) -> QueuedAction {
        QueuedAction::from_new(NewAction::new(kind, json!({"content": "claim"})))
    }

    #[test]
    fn test_format_queue_json_empty() {
        let result = format_queue_json(&[], 0).unwrap();

        assert!(result.contains("\"count\": 0"));
        assert!(result.contains("\"items\": []"));
    }

    #[test]
    fn test_format_queue_json_uses_wire_names() {
        let actions = vec![make_action("analyze")];
        let result = format_queue_json(&actions, 3).unwrap();

        assert!(result.contains("\"count\": 1"));
        assert!(result.contains("\"total\": 3"));
        assert!(result.contains("\"type\": \"analyze\""));
        assert!(result.contains("\"retryCount\": 0"));
    }

    #[test]
    fn test_format_summary_json_noop() {
        let result = format_summary_json(None).unwrap();

        assert!(result.contains("\"ran\": false"));
        assert!(result.contains("\"summary\": null"));
    }

    #[test]
    fn test_format_queued_json_after_drain() {
        let summary = DrainSummary {
            attempted: 1,
            succeeded: 1,
            ..DrainSummary::default()
        };
        let result = format_queued_json(Uuid::nil(), "feedback", false, Some(&summary), None).unwrap();

        assert!(result.contains("\"pending\": false"));
        assert!(result.contains("\"type\": \"feedback\""));
        assert!(result.contains("\"succeeded\": 1"));
        assert!(result.contains("\"analysis\": null"));
    }

    #[test]
    fn test_format_queued_json_with_analysis() {
        let analysis = AnalysisResult {
            id: Some("an-3".to_string()),
            is_misinformation: true,
            confidence: 0.5,
            explanation: String::new(),
            sources: vec![],
        };
        let result = format_queued_json(Uuid::nil(), "analyze", false, None, Some(&analysis)).unwrap();

        assert!(result.contains("\"is_misinformation\": true"));
        assert!(result.contains("\"id\": \"an-3\""));
    }

    #[test]
    fn test_format_analyses_json_empty() {
        let result = format_analyses_json(&[]).unwrap();

        assert!(result.contains("\"count\": 0"));
        assert!(result.contains("\"items\": []"));
    }

    #[test]
    fn test_format_stats_json() {
        let stats = QueueStats {
            pending: 2,
            retrying: 1,
            oldest: None,
        };
        let result = format_stats_json(&stats).unwrap();

        assert!(result.contains("\"pending\": 2"));
        assert!(result.contains("\"oldest\": null"));
    }
}
