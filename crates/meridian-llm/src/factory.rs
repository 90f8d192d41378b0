//! Factory for creating extraction backends.

use std::sync::Arc;

use meridian_core::config::ExtractorProvider;
use meridian_core::error::MeridianResult;
use meridian_core::traits::{ExtractorConfig, ReportExtractor};

use crate::gemini::GeminiExtractor;
use crate::mock::MockExtractor;

/// Factory for creating extraction backends.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create an extraction backend from the given configuration.
    pub fn create(
        provider: ExtractorProvider,
        config: ExtractorConfig,
    ) -> MeridianResult<Arc<dyn ReportExtractor>> {
        match provider {
            ExtractorProvider::Gemini => {
                let extractor = GeminiExtractor::new(config)?;
                Ok(Arc::new(extractor))
            }
            ExtractorProvider::Mock => Ok(Arc::new(MockExtractor::empty())),
        }
    }

    /// Create a Gemini backend with default configuration.
    pub fn gemini() -> MeridianResult<Arc<dyn ReportExtractor>> {
        Self::create(ExtractorProvider::Gemini, ExtractorConfig::default())
    }

    /// Create a Gemini backend with a specific model.
    pub fn gemini_with_model(model: impl Into<String>) -> MeridianResult<Arc<dyn ReportExtractor>> {
        let config = ExtractorConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(ExtractorProvider::Gemini, config)
    }

    /// Create a mock backend with a fixed response.
    pub fn mock(response: impl Into<String>) -> Arc<dyn ReportExtractor> {
        Arc::new(MockExtractor::new(response))
    }
}
