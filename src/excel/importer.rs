//! Excel importer implementation - billing workbook (.xls/.xlsx) → header-keyed rows

use crate::error::{EmsError, EmsResult};
use calamine::{open_workbook_auto, Data, Reader};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column name that marks the header row of a billing sheet
pub const SENTINEL_COLUMN: &str = "electricityNumber";

/// Excel importer for billing workbooks
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read only the sheet names of the workbook
    pub fn sheet_names(&self) -> EmsResult<Vec<String>> {
        let workbook = open_workbook_auto(&self.path)?;
        Ok(workbook.sheet_names())
    }

    /// Read the requested sheets, each cut at its header row
    ///
    /// Fails on the first sheet that is missing or has no header row.
    pub fn import_sheets(&self, sheets: &[String]) -> EmsResult<Vec<SheetTable>> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let available = workbook.sheet_names();

        let mut tables = Vec::with_capacity(sheets.len());
        for sheet_name in sheets {
            if !available.contains(sheet_name) {
                return Err(EmsError::SheetNotFound(sheet_name.clone()));
            }

            let range = workbook.worksheet_range(sheet_name)?;
            let rows: Vec<&[Data]> = range.rows().collect();

            let header_idx = find_header_row(rows.iter().copied())
                .ok_or_else(|| EmsError::HeaderNotFound(sheet_name.clone()))?;
            debug!(
                sheet = %sheet_name,
                header_row = header_idx,
                "located header row"
            );

            tables.push(SheetTable::from_rows(sheet_name, &rows[header_idx..]));
        }

        Ok(tables)
    }
}

/// Index of the first row holding the sentinel column name
pub fn find_header_row<'a, I>(rows: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    rows.into_iter()
        .position(|row| row.iter().any(|cell| cell.to_string().trim() == SENTINEL_COLUMN))
}

/// Sheet names present in every workbook, in the order of the first one
pub fn common_sheet_names<P: AsRef<Path> + Sync>(paths: &[P]) -> EmsResult<Vec<String>> {
    let per_file: Vec<Vec<String>> = paths
        .par_iter()
        .map(|path| ExcelImporter::new(path).sheet_names())
        .collect::<EmsResult<_>>()?;

    let common = per_file
        .into_iter()
        .reduce(|acc, names| acc.into_iter().filter(|n| names.contains(n)).collect())
        .unwrap_or_default();

    Ok(common)
}

/// A worksheet's data rows keyed by the header row's column names
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<Data>>,
}

impl SheetTable {
    /// Build from rows whose first element is the header row
    ///
    /// Fully blank data rows are dropped. When a header name repeats, the
    /// leftmost column wins.
    pub fn from_rows<R: AsRef<[Data]>>(name: &str, rows: &[R]) -> Self {
        let headers: Vec<String> = rows
            .first()
            .map(|header| {
                header
                    .as_ref()
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut columns = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if !header.is_empty() {
                columns.entry(header.clone()).or_insert(idx);
            }
        }

        let rows = rows
            .iter()
            .skip(1)
            .map(|row: &R| -> &[Data] { row.as_ref() })
            .filter(|row| !row.iter().all(is_blank))
            .map(<[Data]>::to_vec)
            .collect();

        Self {
            name: name.to_string(),
            headers,
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        self.rows.iter().map(move |cells| SheetRow { table: self, cells })
    }
}

/// A data row that can be addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    table: &'a SheetTable,
    cells: &'a [Data],
}

impl<'a> SheetRow<'a> {
    /// Cell under `column`, `None` when the column is absent or the cell is empty
    pub fn get(&self, column: &str) -> Option<&'a Data> {
        let idx = *self.table.columns.get(column)?;
        self.cells.get(idx).filter(|cell| !is_blank(cell))
    }

    /// Display text of the cell under `column`, empty when absent
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(|cell| cell.to_string()).unwrap_or_default()
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
