//! meridian - Command-line noon report extraction.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meridian_core::error::MeridianResult;
use meridian_core::types::{DocumentContent, ExamplePair};
use meridian_core::{
    ExtractorProviderConfig, MeridianConfig, ParserConfig, ReportExtractor, ReportParser,
};
use meridian_llm::{ExtractorFactory, MockExtractor};
use meridian_storage::GcsStore;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.suggestion() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run() -> MeridianResult<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MeridianConfig::from_file(path)?,
        None => MeridianConfig::from_env(),
    };
    if let Some(model) = &cli.model {
        config.extractor.config.model = model.clone();
    }

    let extractor = build_extractor(cli.mock.as_deref(), config.extractor)?;
    let store = Arc::new(GcsStore::new(config.storage)?);

    let mut parser = ReportParser::new(store, extractor, ParserConfig::default());
    if let Some(fuel) = cli.single_fuel.or(config.single_fuel) {
        parser = parser.with_single_fuel(fuel);
    }
    if let (Some(doc_path), Some(output_path)) = (&cli.example_doc, &cli.example_output) {
        parser = parser.with_example(load_example(doc_path, output_path)?);
    }

    if cli.raw {
        println!("{}", parser.parse_document(&cli.locator).await?);
    } else {
        let report = parser.parse_report(&cli.locator).await?;
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

/// Build the extraction backend.
///
/// `--mock` wins over the configured provider; otherwise the provider comes
/// from the config, so a `provider = "mock"` config file never demands an
/// API key.
fn build_extractor(
    mock_path: Option<&std::path::Path>,
    extractor: ExtractorProviderConfig,
) -> MeridianResult<Arc<dyn ReportExtractor>> {
    match mock_path {
        Some(path) => {
            let canned = std::fs::read_to_string(path)?;
            Ok(Arc::new(MockExtractor::new(canned)))
        }
        None => ExtractorFactory::create(extractor.provider, extractor.config),
    }
}

/// Load an example pair from local files.
///
/// A `.pdf` example travels as bytes; anything else is read as text.
fn load_example(
    doc_path: &std::path::Path,
    output_path: &std::path::Path,
) -> MeridianResult<ExamplePair> {
    let is_pdf = doc_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    let document = if is_pdf {
        DocumentContent::Pdf(std::fs::read(doc_path)?)
    } else {
        DocumentContent::Text(std::fs::read_to_string(doc_path)?)
    };
    Ok(ExamplePair {
        document,
        expected_output: std::fs::read_to_string(output_path)?.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{ExtractorConfig, ExtractorProvider};
    use std::io::Write;

    #[test]
    fn test_mock_provider_config_needs_no_api_key() {
        let config = ExtractorProviderConfig {
            provider: ExtractorProvider::Mock,
            config: ExtractorConfig {
                api_key: None,
                ..Default::default()
            },
        };
        let extractor = build_extractor(None, config).unwrap();
        assert_eq!(extractor.model_name(), "mock");
    }

    #[test]
    fn test_mock_flag_wins_over_configured_provider() {
        let dir = tempfile::tempdir().unwrap();
        let canned_path = dir.path().join("canned.json");
        std::fs::write(&canned_path, "{\"date\":\"2025-01-24\"}").unwrap();

        let config = ExtractorProviderConfig {
            provider: ExtractorProvider::Gemini,
            config: ExtractorConfig {
                api_key: None,
                ..Default::default()
            },
        };
        let extractor = build_extractor(Some(&canned_path), config).unwrap();
        assert_eq!(extractor.model_name(), "mock");
    }

    #[test]
    fn test_load_example_pdf_pair() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("example.pdf");
        let output_path = dir.path().join("example.json");
        std::fs::write(&doc_path, b"%PDF-1.7 example").unwrap();
        let mut output = std::fs::File::create(&output_path).unwrap();
        writeln!(output, "{{\"date\":\"2025-01-24\",\"fuel_consumed\":[]}}").unwrap();

        let pair = load_example(&doc_path, &output_path).unwrap();
        assert_eq!(
            pair.document,
            DocumentContent::Pdf(b"%PDF-1.7 example".to_vec())
        );
        assert_eq!(
            pair.expected_output,
            "{\"date\":\"2025-01-24\",\"fuel_consumed\":[]}"
        );
    }

    #[test]
    fn test_load_example_text_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("example.txt");
        let output_path = dir.path().join("example.json");
        std::fs::write(&doc_path, "Bunkers consumed: VLSFO - 0.1mt").unwrap();
        std::fs::write(&output_path, "{}").unwrap();

        let pair = load_example(&doc_path, &output_path).unwrap();
        assert!(matches!(pair.document, DocumentContent::Text(_)));
    }
}
