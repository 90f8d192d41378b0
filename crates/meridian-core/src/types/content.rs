//! Document kinds and content payloads.

use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, MeridianResult};

/// Kind of source document, decided from the object path before any fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Raw RFC 5322 email message (`.eml`).
    Email,
    /// PDF document, consumed natively by the backend (`.pdf`).
    Pdf,
}

impl DocumentKind {
    /// Sniff the kind from a file extension.
    ///
    /// Anything other than `.eml` or `.pdf` is an unsupported format;
    /// that decision is made before the document is fetched.
    pub fn from_object_path(path: &str) -> MeridianResult<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(|| {
                MeridianError::unsupported_format(format!("'{}' has no file extension", path))
            })?;
        match extension.as_str() {
            "eml" => Ok(DocumentKind::Email),
            "pdf" => Ok(DocumentKind::Pdf),
            other => Err(MeridianError::unsupported_format(format!(
                "unrecognized extension '.{}'",
                other
            ))),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Email => "email",
            DocumentKind::Pdf => "pdf",
        }
    }
}

/// Normalized document content handed to the extraction backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentContent {
    /// Plain text from an email body.
    Text(String),
    /// Raw PDF bytes.
    Pdf(Vec<u8>),
}

impl DocumentContent {
    /// Check if there is anything to extract from.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentContent::Text(text) => text.trim().is_empty(),
            DocumentContent::Pdf(bytes) => bytes.is_empty(),
        }
    }

    /// Get the payload size in bytes.
    pub fn len(&self) -> usize {
        match self {
            DocumentContent::Text(text) => text.len(),
            DocumentContent::Pdf(bytes) => bytes.len(),
        }
    }

    /// Get the kind this payload belongs to.
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentContent::Text(_) => DocumentKind::Email,
            DocumentContent::Pdf(_) => DocumentKind::Pdf,
        }
    }
}

/// A few-shot steering pair: an example document and its expected output.
///
/// Used on the PDF path, where the caller supplies a same-operator example
/// because PDFs are too visually heterogeneous for an embedded one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamplePair {
    /// The example document.
    pub document: DocumentContent,
    /// The JSON the backend is expected to produce for it.
    pub expected_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_kind_from_object_path() {
        assert_eq!(
            DocumentKind::from_object_path("reports/2025/noon.eml").unwrap(),
            DocumentKind::Email
        );
        assert_eq!(
            DocumentKind::from_object_path("noon.PDF").unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn test_kind_rejects_unknown_extension() {
        let err = DocumentKind::from_object_path("reports/noon.docx").unwrap_err();
        assert_eq!(err.code(), ErrorCode::DocUnsupportedFormat);
    }

    #[test]
    fn test_kind_rejects_missing_extension() {
        let err = DocumentKind::from_object_path("reports/noon").unwrap_err();
        assert_eq!(err.code(), ErrorCode::DocUnsupportedFormat);
    }

    #[test]
    fn test_kind_ignores_dots_in_directories() {
        let err = DocumentKind::from_object_path("year=2025.bak/noon").unwrap_err();
        assert_eq!(err.code(), ErrorCode::DocUnsupportedFormat);
    }

    #[test]
    fn test_content_is_empty() {
        assert!(DocumentContent::Text("   \n".to_string()).is_empty());
        assert!(DocumentContent::Pdf(Vec::new()).is_empty());
        assert!(!DocumentContent::Text("Bunkers consumed".to_string()).is_empty());
    }
}
