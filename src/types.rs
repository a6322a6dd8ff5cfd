use crate::error::EmsResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

//==============================================================================
// Records
//==============================================================================

/// Column names in export order, without the optional `Province` column
pub const BASE_HEADERS: [&str; 6] = [
    "electricityNumber",
    "deviceNumber",
    "Year",
    "Month",
    "Baht",
    "Unit",
];

pub const PROVINCE_HEADER: &str = "Province";

/// Header row for an export, with or without the region column
pub fn record_headers(include_region: bool) -> Vec<&'static str> {
    let mut headers = Vec::with_capacity(BASE_HEADERS.len() + 1);
    if include_region {
        headers.push(PROVINCE_HEADER);
    }
    headers.extend_from_slice(&BASE_HEADERS);
    headers
}

/// One meter's billing for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct BillingRecord {
    pub province: Option<String>,
    pub electricity_number: String,
    pub device_number: String,
    pub year: i32,
    /// Calendar month, always in 1..=12
    pub month: u32,
    pub baht: f64,
    pub unit: f64,
}

//==============================================================================
// Options
//==============================================================================

/// Which artifacts to produce per output set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl OutputFormat {
    pub fn wants_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }

    pub fn wants_excel(self) -> bool {
        matches!(self, OutputFormat::Excel | OutputFormat::Both)
    }
}

/// Keep per-file outputs apart or merge them into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
    #[default]
    Individual,
    Combined,
}

/// Options for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub sheets: Vec<String>,
    pub output_format: OutputFormat,
    pub process_mode: ProcessMode,
    pub include_region: bool,
}

impl ConvertOptions {
    pub fn new(sheets: Vec<String>) -> Self {
        Self {
            sheets,
            output_format: OutputFormat::default(),
            process_mode: ProcessMode::default(),
            include_region: true,
        }
    }
}

//==============================================================================
// Results
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "Excel")]
    Excel,
    #[serde(rename = "ZIP")]
    Zip,
}

/// A named export held in memory until the caller writes it out
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub file_name: String,
    pub kind: ArtifactKind,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, kind: ArtifactKind, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            bytes,
        }
    }

    /// Write the artifact into `dir` under its own file name
    pub fn write_to(&self, dir: &Path) -> EmsResult<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Transformation outcome of a single input file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub original_file_name: String,
    pub result: Result<Vec<BillingRecord>, String>,
}

impl FileOutcome {
    pub fn row_count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// One entry of the report shown after a conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionResult {
    pub original_file_name: String,
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn has_artifacts(&self) -> bool {
        !self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_headers_with_region() {
        assert_eq!(
            record_headers(true),
            vec![
                "Province",
                "electricityNumber",
                "deviceNumber",
                "Year",
                "Month",
                "Baht",
                "Unit"
            ]
        );
    }

    #[test]
    fn test_record_headers_without_region() {
        let headers = record_headers(false);
        assert_eq!(headers.len(), 6);
        assert_eq!(headers[0], "electricityNumber");
    }

    #[test]
    fn test_output_format_flags() {
        assert!(OutputFormat::Csv.wants_csv());
        assert!(!OutputFormat::Csv.wants_excel());
        assert!(OutputFormat::Both.wants_csv() && OutputFormat::Both.wants_excel());
        assert!(!OutputFormat::Excel.wants_csv());
    }

    #[test]
    fn test_modes_deserialize_lowercase() {
        let mode: ProcessMode = serde_json::from_str("\"combined\"").unwrap();
        assert_eq!(mode, ProcessMode::Combined);
        let format: OutputFormat = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(format, OutputFormat::Both);
    }

    #[test]
    fn test_file_outcome_row_count_on_error_is_zero() {
        let outcome = FileOutcome {
            original_file_name: "bad.txt".to_string(),
            result: Err("nope".to_string()),
        };
        assert_eq!(outcome.row_count(), 0);
        assert!(!outcome.is_ok());
    }

    #[test]
    fn test_artifact_write_to() {
        let dir = TempDir::new().unwrap();
        let artifact = Artifact::new("a.csv", ArtifactKind::Csv, b"x".to_vec());
        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"x");
    }
}
