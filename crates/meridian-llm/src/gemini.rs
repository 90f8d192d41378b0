//! Gemini structured-output extraction backend.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use meridian_core::error::{ErrorCode, MeridianError, MeridianResult};
use meridian_core::traits::{
    ExtractionRequest, ExtractionResponse, ExtractorConfig, ReportExtractor, TokenUsage,
};
use meridian_core::types::DocumentContent;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const PDF_MIME_TYPE: &str = "application/pdf";

/// Gemini extraction backend.
///
/// Calls `generateContent` with a system instruction, a response schema, and
/// the document as either a text part or an inline base64 PDF. Few-shot
/// example pairs become alternating user/model turns ahead of the target
/// document.
pub struct GeminiExtractor {
    client: Client,
    config: ExtractorConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiExtractor {
    /// Create a new Gemini extraction backend.
    pub fn new(config: ExtractorConfig) -> MeridianResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                MeridianError::Configuration(
                    "Gemini API key not found. Set GOOGLE_API_KEY environment variable or provide api_key in config.".to_string(),
                )
            })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            api_key
                .parse()
                .map_err(|_| MeridianError::Configuration("Invalid API key format".to_string()))?,
        );
        headers.insert(
            "content-type",
            "application/json"
                .parse()
                .map_err(|_| MeridianError::Configuration("Invalid content type".to_string()))?,
        );

        let client = Client::builder().default_headers(headers).build().map_err(|e| {
            MeridianError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_URL.to_string());

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    fn document_part(content: &DocumentContent) -> GeminiPart {
        match content {
            DocumentContent::Text(text) => GeminiPart {
                text: Some(text.clone()),
                inline_data: None,
            },
            DocumentContent::Pdf(bytes) => GeminiPart {
                text: None,
                inline_data: Some(GeminiInlineData {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    data: STANDARD.encode(bytes),
                }),
            },
        }
    }

    fn build_request(&self, request: &ExtractionRequest) -> GeminiRequest {
        // Example pairs go ahead of the target document as user/model turns,
        // so the model sees document-then-output before the real document.
        let mut contents = Vec::with_capacity(request.examples.len() * 2 + 1);
        for example in &request.examples {
            contents.push(GeminiContent {
                role: Some("user".to_string()),
                parts: vec![Self::document_part(&example.document)],
            });
            contents.push(GeminiContent {
                role: Some("model".to_string()),
                parts: vec![GeminiPart {
                    text: Some(example.expected_output.clone()),
                    inline_data: None,
                }],
            });
        }
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![Self::document_part(&request.content)],
        });

        GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(request.instructions.clone()),
                    inline_data: None,
                }],
            },
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: request
                    .options
                    .temperature
                    .unwrap_or(self.config.temperature),
                max_output_tokens: request
                    .options
                    .max_output_tokens
                    .unwrap_or(self.config.max_output_tokens),
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.clone(),
            },
        }
    }
}

#[async_trait]
impl ReportExtractor for GeminiExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> MeridianResult<ExtractionResponse> {
        let body = self.build_request(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MeridianError::backend(format!("Gemini API request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MeridianError::backend(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let error: Result<GeminiError, _> = serde_json::from_str(&text);
            let message = error
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.clone());
            let code = match status.as_u16() {
                401 | 403 => ErrorCode::BckMissingCredentials,
                _ => ErrorCode::BckRequestFailed,
            };
            return Err(MeridianError::backend_with_code(
                format!("Gemini API error ({}): {}", status, message),
                code,
            ));
        }

        let response: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            MeridianError::backend_with_code(
                format!("Failed to parse response: {}", e),
                ErrorCode::BckInvalidResponse,
            )
        })?;

        let content = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.iter().find_map(|p| p.text.clone()))
            .filter(|t| !t.trim().is_empty());

        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });
        if let Some(usage) = &usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "gemini usage"
            );
        }

        Ok(ExtractionResponse { content, usage })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
