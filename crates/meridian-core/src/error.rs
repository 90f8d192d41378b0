//! Error types for meridian operations.
//!
//! Fetch and format errors are fatal to a single invocation and surface to the
//! caller. Absence of extractable content or of a backend result is not an
//! error; the pipeline returns the empty record for those outcomes.

use thiserror::Error;

/// Result type alias for meridian operations.
pub type MeridianResult<T> = Result<T, MeridianError>;

/// Main error type for all meridian operations.
#[derive(Error, Debug)]
pub enum MeridianError {
    /// Storage reference could not be parsed.
    #[error("Locator error: {message}")]
    Locator { message: String, code: ErrorCode },

    /// Document does not exist in storage.
    #[error("Document not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        object: Option<String>,
    },

    /// File extension is not a supported document kind.
    #[error("Unsupported format: {message}")]
    UnsupportedFormat { message: String, code: ErrorCode },

    /// Storage fetch failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Extraction backend failed. Propagated, never retried.
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend output could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Locator (LOC_xxx)
    LocInvalidReference,
    LocUnsupportedScheme,

    // Document (DOC_xxx)
    DocNotFound,
    DocUnsupportedFormat,

    // Storage (STO_xxx)
    StoRequestFailed,
    StoOperationFailed,

    // Backend (BCK_xxx)
    BckRequestFailed,
    BckInvalidResponse,
    BckMissingCredentials,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::LocInvalidReference => "LOC_001",
            ErrorCode::LocUnsupportedScheme => "LOC_002",
            ErrorCode::DocNotFound => "DOC_001",
            ErrorCode::DocUnsupportedFormat => "DOC_002",
            ErrorCode::StoRequestFailed => "STO_001",
            ErrorCode::StoOperationFailed => "STO_002",
            ErrorCode::BckRequestFailed => "BCK_001",
            ErrorCode::BckInvalidResponse => "BCK_002",
            ErrorCode::BckMissingCredentials => "BCK_003",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl MeridianError {
    /// Create a locator error.
    pub fn locator(message: impl Into<String>) -> Self {
        Self::Locator {
            message: message.into(),
            code: ErrorCode::LocInvalidReference,
        }
    }

    /// Create an unsupported-scheme locator error.
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Self::Locator {
            message: format!("unsupported storage scheme '{}'", scheme.into()),
            code: ErrorCode::LocUnsupportedScheme,
        }
    }

    /// Create a not found error for a storage object.
    pub fn document_not_found(object: impl Into<String>) -> Self {
        let object = object.into();
        Self::NotFound {
            message: format!("object '{}' does not exist", object),
            code: ErrorCode::DocNotFound,
            object: Some(object),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
            code: ErrorCode::DocUnsupportedFormat,
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoOperationFailed,
            source: None,
        }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            code: ErrorCode::BckRequestFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Locator { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::UnsupportedFormat { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Backend { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Locator { .. } => {
                Some("Use a reference of the form <scheme>://<bucket>/<object-path>")
            }
            Self::NotFound { .. } => Some("Check the bucket name and object path"),
            Self::UnsupportedFormat { .. } => {
                Some("Only .eml and .pdf documents are supported")
            }
            Self::Backend { code, .. } if *code == ErrorCode::BckMissingCredentials => {
                Some("Set the GOOGLE_API_KEY environment variable or provide api_key in config")
            }
            Self::Backend { .. } => Some("Check your extraction backend configuration"),
            Self::Configuration(_) => Some("Check your environment variables and config file"),
            _ => None,
        }
    }

    /// Create a backend error with a specific code.
    pub fn backend_with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Backend {
            message: message.into(),
            code,
            source: None,
        }
    }
}
