//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Meridian CLI - Extract structured voyage data from a stored noon report.
#[derive(Debug, Parser)]
#[command(name = "meridian")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage reference of the document, e.g. gs://noon-reports/2025/noon.eml
    pub locator: String,

    /// Configuration file path (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model to use for extraction
    #[arg(long, env = "MERIDIAN_MODEL")]
    pub model: Option<String>,

    /// Treat all fuel consumption as this grade (single-fuel vessels)
    #[arg(long, value_parser = parse_fuel)]
    pub single_fuel: Option<meridian_core::FuelType>,

    /// Example document for few-shot steering (PDF path), a local file
    #[arg(long, requires = "example_output")]
    pub example_doc: Option<PathBuf>,

    /// Expected output for the example document, a local JSON file
    #[arg(long, requires = "example_doc")]
    pub example_output: Option<PathBuf>,

    /// Use the mock backend, replying with the JSON in this file
    #[arg(long, value_name = "CANNED_JSON")]
    pub mock: Option<PathBuf>,

    /// Print the raw backend text instead of the normalized record
    #[arg(long)]
    pub raw: bool,
}

fn parse_fuel(token: &str) -> Result<meridian_core::FuelType, String> {
    meridian_core::FuelType::from_str_flexible(token).ok_or_else(|| {
        format!(
            "unknown fuel type '{}', expected one of VLSFO, MGO, IFO, LSBF, LSGO",
            token
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::FuelType;

    #[test]
    fn test_parses_minimal_invocation() {
        let cli = Cli::parse_from(["meridian", "gs://reports/noon.eml"]);
        assert_eq!(cli.locator, "gs://reports/noon.eml");
        assert!(!cli.raw);
        assert!(cli.single_fuel.is_none());
    }

    #[test]
    fn test_parses_single_fuel_flexibly() {
        let cli = Cli::parse_from(["meridian", "gs://r/n.eml", "--single-fuel", "mgo"]);
        assert_eq!(cli.single_fuel, Some(FuelType::Mgo));
    }

    #[test]
    fn test_rejects_unknown_fuel() {
        assert!(Cli::try_parse_from(["meridian", "gs://r/n.eml", "--single-fuel", "HSFO"]).is_err());
    }

    #[test]
    fn test_example_flags_require_each_other() {
        assert!(Cli::try_parse_from([
            "meridian",
            "gs://r/n.pdf",
            "--example-doc",
            "example.pdf"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "meridian",
            "gs://r/n.pdf",
            "--example-doc",
            "example.pdf",
            "--example-output",
            "example.json"
        ])
        .is_ok());
    }
}
