//! Read-only backend commands: history, single analysis, learning content.

use crate::cli::args::OutputFormat;
use crate::cli::Session;
use crate::error::AthenaError;
use crate::output::{format_analyses, format_analysis, format_education};

/// Execute history command
///
/// # Errors
///
/// Returns an error when offline, if the backend request fails, or if
/// output formatting fails.
pub async fn history(
    session: &Session,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    let mut results = session.client()?.analysis_history().await?;
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    format_analyses(&results, format)
}

/// Execute show command
///
/// # Errors
///
/// Returns an error when offline, if the analysis does not exist, or if
/// output formatting fails.
pub async fn show(session: &Session, id: &str, format: OutputFormat) -> Result<String, AthenaError> {
    let result = session.client()?.get_analysis(id).await?;
    format_analysis(&result, format)
}

/// Execute learn command
///
/// # Errors
///
/// Returns an error when offline, if the backend request fails, or if
/// output formatting fails.
pub async fn learn(
    session: &Session,
    category: Option<&str>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    let mut items = session.client()?.educational_content().await?;
    if let Some(category) = category {
        items.retain(|item| item.category.eq_ignore_ascii_case(category));
    }
    format_education(&items, format)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cli::load_config;

    async fn session_for(dir: &TempDir, api_url: String, offline: bool) -> Session {
        let (paths, config) = load_config(Some(dir.path().to_path_buf()), Some(api_url)).unwrap();
        Session::open(&paths, config, offline).await.unwrap()
    }

    #[tokio::test]
    async fn test_history_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analyses/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a", "is_misinformation": true, "confidence": 0.9},
                {"id": "b", "is_misinformation": false, "confidence": 0.6},
                {"id": "c", "is_misinformation": false, "confidence": 0.7}
            ])))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let session = session_for(&dir, server.uri(), false).await;

        let output = history(&session, Some(2), OutputFormat::Json).await.unwrap();
        assert!(output.contains("\"count\": 2"));
        assert!(!output.contains("\"c\""));
    }

    #[tokio::test]
    async fn test_show_found_and_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analyses/an-5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "an-5",
                "is_misinformation": true,
                "confidence": 0.95,
                "explanation": "Debunked in 2020."
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/analyses/nope/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let session = session_for(&dir, server.uri(), false).await;

        let output = show(&session, "an-5", OutputFormat::Pretty).await.unwrap();
        assert!(output.contains("Likely misinformation"));
        assert!(output.contains("Debunked in 2020."));

        let missing = show(&session, "nope", OutputFormat::Pretty).await;
        assert!(matches!(missing, Err(AthenaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_learn_filters_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/education/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "Understanding Misinformation", "category": "basics"},
                {"id": "2", "title": "Reverse Image Search", "category": "tools"}
            ])))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let session = session_for(&dir, server.uri(), false).await;

        let output = learn(&session, Some("Tools"), OutputFormat::Json).await.unwrap();
        assert!(output.contains("\"count\": 1"));
        assert!(output.contains("Reverse Image Search"));
    }

    #[tokio::test]
    async fn test_reads_refused_offline() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let session = session_for(&dir, server.uri(), true).await;

        let result = history(&session, None, OutputFormat::Pretty).await;
        assert!(matches!(result, Err(AthenaError::Network(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
