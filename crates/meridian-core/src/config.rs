//! Configuration system for meridian.
//!
//! All configuration flows through these structs into constructors; there is
//! no module-level credential state. Environment variables are read once in
//! `from_env`, file formats are TOML and JSON.

use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, MeridianResult};
use crate::traits::ExtractorConfig;
use crate::types::FuelType;

/// Extraction backend provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorProvider {
    #[default]
    Gemini,
    Mock,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: ExtractorProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: ExtractorConfig,
}

/// Document storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base URL override, for emulators and tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// OAuth bearer token for private buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Main meridian configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeridianConfig {
    /// Extraction backend configuration.
    pub extractor: ExtractorProviderConfig,
    /// Document storage configuration.
    pub storage: StorageConfig,
    /// Single-fuel vessel override: treat all consumption as this grade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_fuel: Option<FuelType>,
}

impl MeridianConfig {
    /// Load configuration from a file (TOML or JSON).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MeridianResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| MeridianError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MeridianError::Configuration(e.to_string())),
            _ => Err(MeridianError::Configuration(
                "Unsupported config file format. Use .toml or .json".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Extractor configuration
        if let Ok(model) = std::env::var("MERIDIAN_MODEL") {
            config.extractor.config.model = model;
        }
        if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
            config.extractor.config.api_key = Some(api_key);
        }

        // Storage configuration
        if let Ok(token) = std::env::var("GCS_ACCESS_TOKEN") {
            config.storage.access_token = Some(token);
        }

        // Domain override
        if let Ok(fuel) = std::env::var("MERIDIAN_SINGLE_FUEL") {
            config.single_fuel = FuelType::from_str_flexible(&fuel);
        }

        config
    }
}
