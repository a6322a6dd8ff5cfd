//! Per-file processing and aggregation into downloadable artifacts

use super::calendar::{current_year, date_stamp, report_year, today_utc};
use super::rows::{region_from_filename, transform_rows};
use crate::error::{EmsError, EmsResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{
    Artifact, ArtifactKind, BillingRecord, ConversionResult, ConvertOptions, FileOutcome,
    ProcessMode,
};
use crate::writer;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

/// Whether a file name carries an Excel extension
pub fn is_excel_file_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".xls") || lower.ends_with(".xlsx")
}

/// Base name without the last extension
fn file_stem(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .map(|dot| &file_name[..dot])
        .unwrap_or(file_name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Transform one workbook, capturing any failure in the outcome
pub fn process_file(
    path: &Path,
    sheets: &[String],
    include_region: bool,
    fallback_year: i32,
) -> FileOutcome {
    let original_file_name = display_name(path);
    let result = transform_file(path, &original_file_name, sheets, include_region, fallback_year);

    match &result {
        Ok(records) => debug!(file = %original_file_name, records = records.len(), "transformed"),
        Err(e) => warn!(file = %original_file_name, error = %e, "file skipped"),
    }

    FileOutcome {
        original_file_name,
        result: result.map_err(|e| e.to_string()),
    }
}

fn transform_file(
    path: &Path,
    file_name: &str,
    sheets: &[String],
    include_region: bool,
    fallback_year: i32,
) -> EmsResult<Vec<BillingRecord>> {
    if !is_excel_file_name(file_name) {
        return Err(EmsError::NotExcel(file_name.to_string()));
    }

    let province = include_region.then(|| region_from_filename(file_name));
    let tables = ExcelImporter::new(path).import_sheets(sheets)?;

    let mut records = Vec::new();
    for table in &tables {
        let year = report_year(&table.name, fallback_year);
        records.extend(transform_rows(table, year, province.as_deref()));
    }
    Ok(records)
}

/// Runs the whole pipeline for a set of uploaded workbooks
pub struct Converter {
    options: ConvertOptions,
    today: NaiveDate,
    fallback_year: i32,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            today: today_utc(),
            fallback_year: current_year(),
        }
    }

    /// Pin the date used for file name stamps and the year fallback
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self.fallback_year = today.year();
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn date_stamp(&self) -> String {
        date_stamp(self.today)
    }

    /// Transform every file in parallel, results in input order
    pub fn process_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<FileOutcome> {
        paths
            .par_iter()
            .map(|path| {
                process_file(
                    path.as_ref(),
                    &self.options.sheets,
                    self.options.include_region,
                    self.fallback_year,
                )
            })
            .collect()
    }

    /// Process and aggregate in one step
    pub fn convert<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> EmsResult<Vec<ConversionResult>> {
        if self.options.sheets.is_empty() {
            return Err(EmsError::InvalidOption("no sheet selected".to_string()));
        }
        let outcomes = self.process_files(paths);
        self.aggregate(outcomes)
    }

    /// Shape per-file outcomes into the final report
    ///
    /// Combined mode only applies to more than one file.
    pub fn aggregate(&self, outcomes: Vec<FileOutcome>) -> EmsResult<Vec<ConversionResult>> {
        if self.options.process_mode == ProcessMode::Combined && outcomes.len() > 1 {
            self.aggregate_combined(outcomes)
        } else {
            self.aggregate_individual(outcomes)
        }
    }

    fn aggregate_individual(&self, outcomes: Vec<FileOutcome>) -> EmsResult<Vec<ConversionResult>> {
        let stamp = self.date_stamp();

        outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Err(error) => Ok(ConversionResult {
                    original_file_name: outcome.original_file_name,
                    error: Some(error),
                    ..Default::default()
                }),
                Ok(records) => {
                    let base_name = format!(
                        "{}_transformed_{}",
                        file_stem(&outcome.original_file_name),
                        stamp
                    );
                    Ok(ConversionResult {
                        artifacts: self.build_artifacts(&records, &base_name)?,
                        row_count: Some(records.len()),
                        original_file_name: outcome.original_file_name,
                        error: None,
                    })
                }
            })
            .collect()
    }

    fn aggregate_combined(&self, outcomes: Vec<FileOutcome>) -> EmsResult<Vec<ConversionResult>> {
        let contributing: Vec<&FileOutcome> =
            outcomes.iter().filter(|o| o.row_count() > 0).collect();
        let combined: Vec<BillingRecord> = contributing
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
            .cloned()
            .collect();

        let mut results = Vec::with_capacity(outcomes.len() + 1);

        if !combined.is_empty() {
            let base_name = format!("Combined{}_{}", contributing.len(), self.date_stamp());
            results.push(ConversionResult {
                original_file_name: format!("Combined Result ({} files)", contributing.len()),
                artifacts: self.build_artifacts(&combined, &base_name)?,
                row_count: Some(combined.len()),
                error: None,
            });
        }

        let (processed, failed): (Vec<FileOutcome>, Vec<FileOutcome>) =
            outcomes.into_iter().partition(FileOutcome::is_ok);

        results.extend(processed.into_iter().map(|outcome| ConversionResult {
            row_count: Some(outcome.row_count()),
            original_file_name: outcome.original_file_name,
            ..Default::default()
        }));
        results.extend(failed.into_iter().map(|outcome| ConversionResult {
            original_file_name: outcome.original_file_name,
            error: outcome.result.err(),
            ..Default::default()
        }));

        Ok(results)
    }

    fn build_artifacts(&self, records: &[BillingRecord], base_name: &str) -> EmsResult<Vec<Artifact>> {
        let format = self.options.output_format;
        let include_region = self.options.include_region;
        let mut artifacts = Vec::new();

        if format.wants_csv() {
            artifacts.push(Artifact::new(
                format!("{base_name}.csv"),
                ArtifactKind::Csv,
                writer::records_to_csv(records, include_region)?,
            ));
        }
        if format.wants_excel() {
            artifacts.push(Artifact::new(
                format!("{base_name}.xlsx"),
                ArtifactKind::Excel,
                ExcelExporter::new(include_region).export_to_buffer(records)?,
            ));
        }

        Ok(artifacts)
    }

    /// ZIP of every artifact in the report, `None` when there is nothing to bundle
    pub fn bundle(&self, results: &[ConversionResult]) -> EmsResult<Option<Artifact>> {
        let artifacts: Vec<&Artifact> = results.iter().flat_map(|r| r.artifacts.iter()).collect();
        if artifacts.is_empty() {
            return Ok(None);
        }

        let bytes = writer::bundle_zip(&artifacts)?;
        Ok(Some(Artifact::new(
            format!("transformed_files_{}.zip", self.date_stamp()),
            ArtifactKind::Zip,
            bytes,
        )))
    }
}
