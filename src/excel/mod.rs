//! Excel import/export module for billing workbooks
//!
//! - Import: billing workbook (.xls/.xlsx) → header-keyed sheet rows
//! - Export: transformed records → single-sheet .xlsx

mod exporter;
mod importer;

pub use exporter::{ExcelExporter, SHEET_NAME};
pub use importer::{
    common_sheet_names, find_header_row, ExcelImporter, SheetRow, SheetTable, SENTINEL_COLUMN,
};
