//! meridian-llm - Extraction backend implementations for meridian.
//!
//! # Supported Backends
//!
//! - **Gemini** - structured-output extraction over the `generateContent`
//!   API, text and native PDF payloads.
//! - **Mock** - deterministic canned responses for tests and offline runs.
//!
//! # Example
//!
//! ```ignore
//! use meridian_llm::ExtractorFactory;
//!
//! // Create a Gemini backend
//! let extractor = ExtractorFactory::gemini()?;
//!
//! // Or with a specific model
//! let extractor = ExtractorFactory::gemini_with_model("gemini-2.5-pro")?;
//! ```

mod factory;
mod gemini;
mod mock;

pub use factory::ExtractorFactory;
pub use gemini::GeminiExtractor;
pub use mock::{MockExtractor, RecordedRequest};
