//! Extraction backend trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MeridianResult;
use crate::types::{DocumentContent, ExamplePair};

/// Everything one extraction call needs: the document, the instruction set,
/// the response schema, optional steering examples, and generation knobs.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Normalized document content.
    pub content: DocumentContent,
    /// System instructions for the backend.
    pub instructions: String,
    /// Response schema the backend output must conform to.
    pub schema: serde_json::Value,
    /// Few-shot example pairs, sent ahead of the target document.
    pub examples: Vec<ExamplePair>,
    /// Per-call generation overrides.
    pub options: GenerationOptions,
}

/// Response from an extraction call.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResponse {
    /// Raw structured text, `None` when the backend produced nothing.
    pub content: Option<String>,
    /// Token usage statistics, when the backend reports them.
    pub usage: Option<TokenUsage>,
}

impl ExtractionResponse {
    /// Get the content or an empty string.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Check whether the backend produced any usable text.
    pub fn is_empty(&self) -> bool {
        self.content_or_empty().trim().is_empty()
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens.
    pub total_tokens: u32,
}

/// Per-call generation overrides. Unset fields fall back to the
/// extractor's configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_output_tokens: Option<u32>,
}

/// Core extraction trait - all backends implement this.
///
/// The backend is an opaque capability: it receives content, instructions,
/// and a schema, and returns raw structured text. An empty result is the
/// normal "nothing extracted" outcome, not an error.
#[async_trait]
pub trait ReportExtractor: Send + Sync {
    /// Run one extraction.
    async fn extract(&self, request: &ExtractionRequest) -> MeridianResult<ExtractionResponse>;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Check if this backend accepts raw PDF payloads.
    fn supports_pdf(&self) -> bool {
        true
    }
}

/// Extraction backend configuration.
///
/// The near-zero temperature and bounded output budget are required
/// configuration: they bound both cost and variance of an extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for the backend API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.01
}

fn default_max_output_tokens() -> u32 {
    1000
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}
