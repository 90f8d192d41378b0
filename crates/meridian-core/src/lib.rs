//! meridian-core - Core library for meridian.
//!
//! This crate provides the noon report record types, the collaborator
//! traits, the instruction sets, and the [`ReportParser`] pipeline that
//! turns a stored noon report document into a structured record.
//!
//! # Example
//!
//! ```ignore
//! use meridian_core::{ParserConfig, ReportParser};
//!
//! let parser = ReportParser::new(store, extractor, ParserConfig::default());
//! let report = parser.parse_report("gs://noon-reports/2025/noon.eml").await?;
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod prompts;
pub mod schema;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{ExtractorProvider, ExtractorProviderConfig, MeridianConfig, StorageConfig};
pub use error::{ErrorCode, MeridianError, MeridianResult};
pub use parser::{ParserConfig, ReportParser};
pub use prompts::{select_instructions, InstructionSet, PROMPT_REVISION};
pub use traits::{
    DocumentStore, ExtractionRequest, ExtractionResponse, ExtractorConfig, GenerationOptions,
    Locator, ReportExtractor, TokenUsage,
};
pub use types::{
    DocumentContent, DocumentKind, EngineBreakdown, ExamplePair, FuelEntry, FuelType, FuelValue,
    NoonReport, EMPTY_RECORD,
};
