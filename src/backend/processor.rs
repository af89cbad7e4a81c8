//! Delivery of queued actions to the backend.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::client::ApiClient;
use crate::backend::types::{AnalysisResult, AnalyzeRequest, FeedbackRequest};
use crate::error::AthenaError;
use crate::offline::{ActionProcessor, NewAction, ProcessError, QueuedAction};

/// Action type for a content analysis submission.
pub const ANALYZE: &str = "analyze";

/// Action type for analysis feedback.
pub const FEEDBACK: &str = "feedback";

/// Build a queueable analysis submission.
///
/// # Errors
///
/// Returns an error if `content` is blank.
pub fn analyze_action(content: &str) -> Result<NewAction, AthenaError> {
    if content.trim().is_empty() {
        return Err(AthenaError::InvalidInput(
            "Please enter some text to analyze".to_string(),
        ));
    }
    let payload = serde_json::to_value(AnalyzeRequest {
        content: content.to_string(),
    })?;
    Ok(NewAction::new(ANALYZE, payload))
}

/// Build a queueable feedback submission.
///
/// # Errors
///
/// Returns an error if `analysis_id` is blank.
pub fn feedback_action(analysis_id: &str, is_correct: bool) -> Result<NewAction, AthenaError> {
    if analysis_id.trim().is_empty() {
        return Err(AthenaError::InvalidInput(
            "Analysis id must not be empty".to_string(),
        ));
    }
    let payload = serde_json::to_value(FeedbackRequest {
        analysis_id: analysis_id.to_string(),
        is_correct,
    })?;
    Ok(NewAction::new(FEEDBACK, payload))
}

/// Backend verdict for a delivered `analyze` action.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredAnalysis {
    pub action_id: Uuid,
    pub result: AnalysisResult,
}

/// Processor that delivers `analyze` and `feedback` actions over HTTP.
pub struct BackendProcessor {
    client: ApiClient,
    results: Option<mpsc::UnboundedSender<DeliveredAnalysis>>,
}

impl BackendProcessor {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            results: None,
        }
    }

    /// Also send every delivered analysis to `results`.
    #[must_use]
    pub fn with_results(mut self, results: mpsc::UnboundedSender<DeliveredAnalysis>) -> Self {
        self.results = Some(results);
        self
    }
}

fn decode<T: serde::de::DeserializeOwned>(action: &QueuedAction) -> Result<T, ProcessError> {
    serde_json::from_value(action.payload.clone())
        .map_err(|e| ProcessError::new(format!("Invalid {} payload: {e}", action.kind)))
}

#[async_trait]
impl ActionProcessor for BackendProcessor {
    async fn process(&self, action: &QueuedAction) -> Result<bool, ProcessError> {
        match action.kind.as_str() {
            ANALYZE => {
                let request: AnalyzeRequest = decode(action)?;
                let result = self.client.analyze_content(&request.content).await?;
                info!(
                    id = %action.id,
                    misinformation = result.is_misinformation,
                    confidence = result.confidence,
                    "Analysis delivered"
                );
                if let Some(results) = &self.results {
                    let delivered = DeliveredAnalysis {
                        action_id: action.id,
                        result,
                    };
                    if results.send(delivered).is_err() {
                        debug!(id = %action.id, "Result receiver gone, verdict not forwarded");
                    }
                }
                Ok(true)
            }
            FEEDBACK => {
                let request: FeedbackRequest = decode(action)?;
                self.client.submit_feedback(&request).await?;
                info!(id = %action.id, analysis = %request.analysis_id, "Feedback delivered");
                Ok(true)
            }
            other => Err(ProcessError::new(format!("Unknown action type: {other}"))),
        }
    }
}
