use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::backend::types::{AnalysisResult, AnalyzeRequest, EducationalContent, FeedbackRequest};
use crate::config::ApiConfig;
use crate::error::AthenaError;

/// REST client for the analysis backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AthenaError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AthenaError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AthenaError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit content for analysis.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is blank, the backend is unreachable,
    /// or it answers with a non-success status.
    pub async fn analyze_content(&self, content: &str) -> Result<AnalysisResult, AthenaError> {
        if content.trim().is_empty() {
            return Err(AthenaError::InvalidInput(
                "Please enter some text to analyze".to_string(),
            ));
        }

        let body = AnalyzeRequest {
            content: content.to_string(),
        };
        self.fetch(self.http.post(self.url("/analyze/")).json(&body))
            .await
    }

    /// List previous analyses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn analysis_history(&self) -> Result<Vec<AnalysisResult>, AthenaError> {
        self.fetch(self.http.get(self.url("/analyses/"))).await
    }

    /// Fetch one analysis by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on 404, otherwise an error if the request fails.
    pub async fn get_analysis(&self, id: &str) -> Result<AnalysisResult, AthenaError> {
        let request = self.http.get(self.url(&format!("/analyses/{id}/")));
        match self.fetch(request).await {
            Err(AthenaError::Backend { status: 404, .. }) => {
                Err(AthenaError::NotFound(format!("Analysis '{id}'")))
            }
            other => other,
        }
    }

    /// List educational content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn educational_content(&self) -> Result<Vec<EducationalContent>, AthenaError> {
        self.fetch(self.http.get(self.url("/education/"))).await
    }

    /// Report whether an analysis was correct.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), AthenaError> {
        let response = self
            .http
            .post(self.url("/feedback/"))
            .json(feedback)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AthenaError> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turn a non-success response into `AthenaError::Backend`.
async fn check_status(response: Response) -> Result<Response, AthenaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };

    Err(AthenaError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/analyze/"), "http://localhost:8000/api/analyze/");
    }

    #[tokio::test]
    async fn test_analyze_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze/"))
            .and(body_json(json!({"content": "The moon is made of cheese"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "an-1",
                "is_misinformation": true,
                "confidence": 0.97,
                "explanation": "Contradicted by lunar samples.",
                "sources": [{"title": "NASA"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client
            .analyze_content("The moon is made of cheese")
            .await
            .unwrap();

        assert!(result.is_misinformation);
        assert_eq!(result.id.as_deref(), Some("an-1"));
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_blank_content_rejected_locally() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        let result = client.analyze_content("   ").await;
        assert!(matches!(result, Err(AthenaError::InvalidInput(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let feedback = FeedbackRequest {
            analysis_id: "an-1".to_string(),
            is_correct: false,
        };

        match client.submit_feedback(&feedback).await {
            Err(AthenaError::Backend { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_feedback_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback/"))
            .and(body_json(json!({"analysis_id": "an-1", "is_correct": true})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .submit_feedback(&FeedbackRequest {
                analysis_id: "an-1".to_string(),
                is_correct: true,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_analysis_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analyses/missing/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.get_analysis("missing").await;
        assert!(matches!(result, Err(AthenaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_history_and_education() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analyses/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"is_misinformation": false, "confidence": 0.5}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/education/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "1",
                "title": "Understanding Misinformation",
                "content": "...",
                "category": "basics",
                "difficulty": "beginner",
                "tags": ["misinformation", "basics"]
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.analysis_history().await.unwrap().len(), 1);

        let content = client.educational_content().await.unwrap();
        assert_eq!(content[0].title, "Understanding Misinformation");
        assert_eq!(content[0].tags, vec!["misinformation", "basics"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Nothing listens on port 9 in the test environment.
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = client.analysis_history().await;
        assert!(matches!(result, Err(AthenaError::Network(_))));
    }
}
