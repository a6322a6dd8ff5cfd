//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::cli::{resolve_sheets, run_conversion};
use crate::config::Preferences;
use crate::error::{EmsError, EmsResult};
use crate::excel::common_sheet_names;
use crate::types::{ConversionResult, ConvertOptions, OutputFormat, ProcessMode};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

fn reply<T: Serialize>(result: EmsResult<T>) -> ApiReply<T> {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(e) => {
            warn!(error = %e, "request failed");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::err(e.to_string())))
        }
    }
}

/// Run blocking workbook IO off the async executor
async fn blocking<T, F>(work: F) -> EmsResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> EmsResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| EmsError::Io(std::io::Error::other(e.to_string())))?
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "EMS API Server".to_string(),
        version: state.version.clone(),
        description: "Electricity billing workbook converter".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/v1/sheets",
                "POST",
                "List sheet names common to all workbooks",
            ),
            EndpointInfo::new(
                "/api/v1/convert",
                "POST",
                "Convert workbooks to CSV/XLSX in an output directory",
            ),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["sheets".to_string(), "convert".to_string()],
    }))
}

/// Sheets request
#[derive(Deserialize)]
pub struct SheetsRequest {
    pub files: Vec<String>,
}

/// Sheets response
#[derive(Serialize, Default)]
pub struct SheetsResponse {
    pub sheets: Vec<String>,
    /// Set when exactly one sheet is common, matching what convert would pick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

/// POST /api/v1/sheets - Sheet names common to all files
pub async fn sheets(Json(req): Json<SheetsRequest>) -> impl IntoResponse {
    let files: Vec<PathBuf> = req.files.iter().map(PathBuf::from).collect();

    let result = blocking(move || {
        let sheets = common_sheet_names(files.as_slice())?;
        let selected = match sheets.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        Ok(SheetsResponse { sheets, selected })
    })
    .await;

    reply(result)
}

/// Convert request
#[derive(Deserialize)]
pub struct ConvertRequest {
    pub files: Vec<String>,
    #[serde(default)]
    pub sheets: Vec<String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub mode: Option<ProcessMode>,
    #[serde(default)]
    pub include_region: Option<bool>,
    pub output_dir: String,
    #[serde(default)]
    pub zip: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl ConvertRequest {
    fn options(&self, sheets: Vec<String>) -> ConvertOptions {
        let defaults = Preferences::default();
        ConvertOptions {
            sheets,
            output_format: self.format.unwrap_or(defaults.output_format),
            process_mode: self.mode.unwrap_or(defaults.process_mode),
            include_region: self.include_region.unwrap_or(defaults.include_region),
        }
    }
}

/// Convert response
#[derive(Serialize, Default)]
pub struct ConvertResponse {
    pub sheets: Vec<String>,
    pub results: Vec<ConversionResult>,
    pub written: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    pub total_rows: usize,
    pub failed: usize,
}

/// POST /api/v1/convert - Convert workbooks and write the artifacts
pub async fn convert(Json(req): Json<ConvertRequest>) -> impl IntoResponse {
    let result = blocking(move || {
        let files: Vec<PathBuf> = req.files.iter().map(PathBuf::from).collect();
        let sheets = resolve_sheets(&req.sheets, &files)?;
        let options = req.options(sheets.clone());
        let output_dir = PathBuf::from(&req.output_dir);

        let report = run_conversion(&files, options, &output_dir, req.zip, req.dry_run)?;

        Ok(ConvertResponse {
            sheets,
            total_rows: report.total_rows(),
            failed: report.failed_count(),
            written: report
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            bundle: report.bundle.as_ref().map(|p| p.display().to_string()),
            results: report.results,
        })
    })
    .await;

    reply(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_reply_maps_errors_to_422() {
        let (status, Json(body)) = reply::<SheetsResponse>(Err(EmsError::NoCommonSheet));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.success);
    }

    #[test]
    fn test_convert_request_defaults() {
        let json = r#"{"files": ["a.xlsx"], "output_dir": "out"}"#;
        let req: ConvertRequest = serde_json::from_str(json).unwrap();

        assert!(req.sheets.is_empty());
        assert!(!req.zip);
        assert!(!req.dry_run);

        let options = req.options(vec!["data_2566".to_string()]);
        assert_eq!(options.output_format, OutputFormat::Csv);
        assert_eq!(options.process_mode, ProcessMode::Individual);
        assert!(options.include_region);
    }

    #[test]
    fn test_convert_request_explicit_options() {
        let json = r#"{
            "files": ["a.xlsx", "b.xlsx"],
            "sheets": ["data_2566"],
            "format": "both",
            "mode": "combined",
            "include_region": false,
            "output_dir": "out",
            "zip": true
        }"#;
        let req: ConvertRequest = serde_json::from_str(json).unwrap();
        let options = req.options(req.sheets.clone());

        assert_eq!(options.output_format, OutputFormat::Both);
        assert_eq!(options.process_mode, ProcessMode::Combined);
        assert!(!options.include_region);
        assert!(req.zip);
    }

    #[test]
    fn test_convert_response_serializes_results() {
        let response = ConvertResponse {
            results: vec![ConversionResult {
                original_file_name: "bad.txt".to_string(),
                error: Some("Not an Excel file (.xls/.xlsx): bad.txt".to_string()),
                ..Default::default()
            }],
            failed: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"original_file_name\":\"bad.txt\""));
        assert!(json.contains("\"failed\":1"));
        assert!(!json.contains("\"bundle\""));
        assert!(!json.contains("\"row_count\""));
    }
}
