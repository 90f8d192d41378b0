//! The report parsing pipeline.
//!
//! [`ReportParser`] ties the collaborators together: fetch the document,
//! normalize its content, select the instruction set, invoke the extraction
//! backend, and hand the structured result back. Two outcomes short-circuit
//! to the empty record without error: a document with no extractable content
//! (the backend is never called) and a backend that returns nothing.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::MeridianResult;
use crate::normalize::extract_plain_text;
use crate::prompts::{select_instructions, PROMPT_REVISION};
use crate::traits::{DocumentStore, ExtractionRequest, GenerationOptions, Locator, ReportExtractor};
use crate::types::{DocumentContent, DocumentKind, ExamplePair, FuelType, NoonReport, EMPTY_RECORD};

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Per-call generation overrides passed to the backend.
    pub generation: GenerationOptions,
}

/// Parses noon report documents into structured records.
///
/// Collaborators are injected at construction and shared immutably; one
/// parser can serve any number of sequential invocations.
pub struct ReportParser {
    store: Arc<dyn DocumentStore>,
    extractor: Arc<dyn ReportExtractor>,
    config: ParserConfig,
    single_fuel: Option<FuelType>,
    example: Option<ExamplePair>,
}

impl ReportParser {
    /// Create a new parser over a document store and an extraction backend.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn ReportExtractor>,
        config: ParserConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            config,
            single_fuel: None,
            example: None,
        }
    }

    /// Constrain fuel-type inference to a single grade.
    ///
    /// For vessels known to burn one fuel type; appends a hint to the
    /// instructions, the schema is unchanged.
    pub fn with_single_fuel(mut self, fuel: FuelType) -> Self {
        self.single_fuel = Some(fuel);
        self
    }

    /// Attach an external few-shot example pair.
    ///
    /// Sent to the backend ahead of the target document. Meant for the PDF
    /// path, where the caller supplies a same-operator example because PDFs
    /// are too visually heterogeneous for an embedded one.
    pub fn with_example(mut self, example: ExamplePair) -> Self {
        self.example = Some(example);
        self
    }

    /// Parse one document into its raw structured JSON text.
    ///
    /// `"{}"` is the canonical empty outcome: nothing extractable, or the
    /// backend produced nothing. Fetch and format errors propagate.
    pub async fn parse_document(&self, reference: &str) -> MeridianResult<String> {
        let locator = Locator::parse(reference)?;
        // Kind is decided from the object path alone, before any fetch.
        let kind = DocumentKind::from_object_path(&locator.object)?;

        let content = match kind {
            DocumentKind::Email => {
                let raw = self.store.fetch_text(&locator).await?;
                match extract_plain_text(&raw) {
                    Some(text) => DocumentContent::Text(text),
                    None => {
                        info!(%locator, "no plain-text part, skipping extraction");
                        return Ok(EMPTY_RECORD.to_string());
                    }
                }
            }
            DocumentKind::Pdf => DocumentContent::Pdf(self.store.fetch_bytes(&locator).await?),
        };
        if content.is_empty() {
            info!(%locator, "document is empty, skipping extraction");
            return Ok(EMPTY_RECORD.to_string());
        }
        debug!(
            kind = kind.as_str(),
            content_bytes = content.len(),
            revision = PROMPT_REVISION,
            "content normalized"
        );

        let instruction_set = select_instructions(kind, self.single_fuel);
        let request = ExtractionRequest {
            content,
            instructions: instruction_set.instructions,
            schema: instruction_set.schema,
            examples: self.example.clone().into_iter().collect(),
            options: self.config.generation.clone(),
        };

        let response = self.extractor.extract(&request).await?;
        if response.is_empty() {
            info!(%locator, "backend returned nothing");
            return Ok(EMPTY_RECORD.to_string());
        }
        let text = response.content_or_empty().trim().to_string();
        info!(%locator, kind = kind.as_str(), output_bytes = text.len(), "extraction complete");
        Ok(text)
    }

    /// Parse one document into a normalized [`NoonReport`].
    ///
    /// Decodes the backend text leniently and enforces the record
    /// invariants; see [`NoonReport::from_backend_json`].
    pub async fn parse_report(&self, reference: &str) -> MeridianResult<NoonReport> {
        let text = self.parse_document(reference).await?;
        NoonReport::from_backend_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, MeridianError};
    use crate::traits::ExtractionResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixtureStore {
        objects: HashMap<String, Vec<u8>>,
        fetches: Mutex<usize>,
    }

    impl FixtureStore {
        fn new() -> Self {
            Self {
                objects: HashMap::new(),
                fetches: Mutex::new(0),
            }
        }

        fn with_object(mut self, object: &str, content: &[u8]) -> Self {
            self.objects.insert(object.to_string(), content.to_vec());
            self
        }

        fn fetch_count(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl DocumentStore for FixtureStore {
        async fn fetch_text(&self, locator: &Locator) -> MeridianResult<String> {
            let bytes = self.fetch_bytes(locator).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }

        async fn fetch_bytes(&self, locator: &Locator) -> MeridianResult<Vec<u8>> {
            *self.fetches.lock().unwrap() += 1;
            self.objects
                .get(&locator.object)
                .cloned()
                .ok_or_else(|| MeridianError::document_not_found(&locator.object))
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    struct FixedExtractor {
        response: Option<String>,
        calls: Mutex<usize>,
        last_request: Mutex<Option<(String, usize)>>,
    }

    impl FixedExtractor {
        fn new(response: Option<&str>) -> Self {
            Self {
                response: response.map(str::to_string),
                calls: Mutex::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ReportExtractor for FixedExtractor {
        async fn extract(
            &self,
            request: &ExtractionRequest,
        ) -> MeridianResult<ExtractionResponse> {
            *self.calls.lock().unwrap() += 1;
            *self.last_request.lock().unwrap() =
                Some((request.instructions.clone(), request.examples.len()));
            Ok(ExtractionResponse {
                content: self.response.clone(),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    const EMAIL: &str = "From: master@libra-sun.example\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        24th Jan'25\r\n\
        Bunkers consumed in last 24 hours: VLSFO - 0.1mt, MGO - 2.4mt\r\n";

    const HTML_EMAIL: &str = "From: master@libra-sun.example\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        \r\n\
        <p>boilerplate</p>\r\n";

    fn parser(store: Arc<FixtureStore>, extractor: Arc<FixedExtractor>) -> ReportParser {
        ReportParser::new(store, extractor, ParserConfig::default())
    }

    #[tokio::test]
    async fn test_happy_path_returns_backend_text() {
        let store = Arc::new(FixtureStore::new().with_object("noon.eml", EMAIL.as_bytes()));
        let extractor = Arc::new(FixedExtractor::new(Some(
            r#"{"date": "2025-01-24", "fuel_consumed": [{"fuel_type":"VLSFO","value":0.1}]}"#,
        )));
        let result = parser(store, extractor.clone())
            .parse_document("gs://reports/noon.eml")
            .await
            .unwrap();
        assert!(result.contains("2025-01-24"));
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_plain_text_part_short_circuits() {
        let store = Arc::new(FixtureStore::new().with_object("noon.eml", HTML_EMAIL.as_bytes()));
        let extractor = Arc::new(FixedExtractor::new(Some("{}")));
        let result = parser(store, extractor.clone())
            .parse_document("gs://reports/noon.eml")
            .await
            .unwrap();
        assert_eq!(result, EMPTY_RECORD);
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_backend_result_is_empty_record() {
        let store = Arc::new(FixtureStore::new().with_object("noon.eml", EMAIL.as_bytes()));
        let extractor = Arc::new(FixedExtractor::new(None));
        let result = parser(store, extractor)
            .parse_document("gs://reports/noon.eml")
            .await
            .unwrap();
        assert_eq!(result, EMPTY_RECORD);
    }

    #[tokio::test]
    async fn test_unsupported_format_fails_before_fetch() {
        let store = Arc::new(FixtureStore::new().with_object("noon.docx", b"word soup"));
        let extractor = Arc::new(FixedExtractor::new(Some("{}")));
        let err = parser(store.clone(), extractor)
            .parse_document("gs://reports/noon.docx")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DocUnsupportedFormat);
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_object_propagates_not_found() {
        let store = Arc::new(FixtureStore::new());
        let extractor = Arc::new(FixedExtractor::new(Some("{}")));
        let err = parser(store, extractor)
            .parse_document("gs://reports/noon.eml")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DocNotFound);
    }

    #[tokio::test]
    async fn test_single_fuel_hint_reaches_backend() {
        let store = Arc::new(FixtureStore::new().with_object("noon.eml", EMAIL.as_bytes()));
        let extractor = Arc::new(FixedExtractor::new(Some("{}")));
        parser(store, extractor.clone())
            .with_single_fuel(FuelType::Mgo)
            .parse_document("gs://reports/noon.eml")
            .await
            .unwrap();
        let (instructions, _) = extractor.last_request.lock().unwrap().clone().unwrap();
        assert!(instructions.contains("only burns MGO"));
    }

    #[tokio::test]
    async fn test_example_pair_reaches_backend() {
        let store = Arc::new(FixtureStore::new().with_object("noon.pdf", b"%PDF-1.7 fixture"));
        let extractor = Arc::new(FixedExtractor::new(Some("{}")));
        parser(store, extractor.clone())
            .with_example(ExamplePair {
                document: DocumentContent::Pdf(b"%PDF-1.7 example".to_vec()),
                expected_output: r#"{"date":"2025-01-24","fuel_consumed":[]}"#.to_string(),
            })
            .parse_document("gs://reports/noon.pdf")
            .await
            .unwrap();
        let (_, examples) = extractor.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(examples, 1);
    }

    #[tokio::test]
    async fn test_parse_report_decodes_and_normalizes() {
        let store = Arc::new(FixtureStore::new().with_object("noon.eml", EMAIL.as_bytes()));
        let extractor = Arc::new(FixedExtractor::new(Some(
            r#"{"date": "2025-01-24", "fuel_consumed": [{"fuel_type":"VLSFO","value":0.1},{"fuel_type":"HSFO","value":3.0}]}"#,
        )));
        let report = parser(store, extractor)
            .parse_report("gs://reports/noon.eml")
            .await
            .unwrap();
        // The unknown HSFO token is dropped, not coerced.
        assert_eq!(report.fuel_consumed.len(), 1);
    }
}
