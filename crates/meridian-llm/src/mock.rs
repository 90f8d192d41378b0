//! Mock extraction backend for deterministic testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use meridian_core::error::{MeridianError, MeridianResult};
use meridian_core::traits::{ExtractionRequest, ExtractionResponse, ReportExtractor};
use meridian_core::types::DocumentContent;

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// System instructions.
    pub instructions: String,
    /// Response schema.
    pub schema: serde_json::Value,
    /// Number of example pairs attached.
    pub example_count: usize,
    /// Document text, or `None` for a PDF payload.
    pub document_text: Option<String>,
}

/// Mock extraction backend.
///
/// Returns pre-configured responses without any network call. Responses are
/// keyed by a substring of the document text; unmatched documents get the
/// default response. Every request is recorded for later assertions.
#[derive(Default, Clone)]
pub struct MockExtractor {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    error: Option<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockExtractor {
    /// Create a mock with a fixed response for all documents.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            ..Default::default()
        }
    }

    /// Create a mock that returns nothing, the empty-backend outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mock that fails every call with a backend error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Respond with `response` when the document text contains `needle`.
    pub fn with_response(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(needle.into(), response.into());
        self
    }

    /// Number of extraction calls served.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn lookup(&self, document_text: Option<&str>) -> Option<String> {
        if let Some(text) = document_text {
            let responses = self.responses.lock().unwrap();
            for (needle, response) in responses.iter() {
                if text.contains(needle.as_str()) {
                    return Some(response.clone());
                }
            }
        }
        self.default_response.clone()
    }
}

#[async_trait]
impl ReportExtractor for MockExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> MeridianResult<ExtractionResponse> {
        let document_text = match &request.content {
            DocumentContent::Text(text) => Some(text.clone()),
            DocumentContent::Pdf(_) => None,
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            instructions: request.instructions.clone(),
            schema: request.schema.clone(),
            example_count: request.examples.len(),
            document_text: document_text.clone(),
        });

        if let Some(message) = &self.error {
            return Err(MeridianError::backend(message.clone()));
        }
        Ok(ExtractionResponse {
            content: self.lookup(document_text.as_deref()),
            usage: None,
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::traits::GenerationOptions;

    fn request(text: &str) -> ExtractionRequest {
        ExtractionRequest {
            content: DocumentContent::Text(text.to_string()),
            instructions: "extract".to_string(),
            schema: serde_json::json!({}),
            examples: Vec::new(),
            options: GenerationOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_fixed_response_and_counting() {
        let mock = MockExtractor::new("{}");
        let response = mock.extract(&request("anything")).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("{}"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_keyed_response_beats_default() {
        let mock = MockExtractor::new("{}")
            .with_response("VLSFO", r#"{"date":"2025-01-24","fuel_consumed":[]}"#);
        let hit = mock.extract(&request("Bunkers: VLSFO - 0.1mt")).await.unwrap();
        assert!(hit.content.unwrap().contains("2025-01-24"));
        let miss = mock.extract(&request("nothing relevant")).await.unwrap();
        assert_eq!(miss.content.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_empty_mock_returns_nothing() {
        let mock = MockExtractor::empty();
        let response = mock.extract(&request("anything")).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_failing_mock_errors() {
        let mock = MockExtractor::failing("quota exhausted");
        let err = mock.extract(&request("anything")).await.unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
        // The failed call is still recorded.
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_records_request_details() {
        let mock = MockExtractor::new("{}");
        mock.extract(&request("document body")).await.unwrap();
        let recorded = mock.last_request().unwrap();
        assert_eq!(recorded.instructions, "extract");
        assert_eq!(recorded.example_count, 0);
        assert_eq!(recorded.document_text.as_deref(), Some("document body"));
    }
}
