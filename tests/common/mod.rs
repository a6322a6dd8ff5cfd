//! Fixture workbooks shaped like the monthly billing exports

#![allow(dead_code)]

use ems_convert::transform::THAI_MONTHS;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// Header row: identifiers, then `baht <m>` / `unit <m>` for each month
pub fn billing_header() -> Vec<Cell> {
    let mut header = vec![text("electricityNumber"), text("deviceNumber")];
    for (month_name, _) in THAI_MONTHS {
        header.push(text(&format!("baht {month_name}")));
        header.push(text(&format!("unit {month_name}")));
    }
    header
}

/// A meter row with only January's amount filled in
pub fn meter_row(id: &str, device: &str, january_baht: Cell) -> Vec<Cell> {
    vec![text(id), text(device), january_baht]
}

/// Preamble rows, header row, then `rows`
pub fn billing_sheet(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let mut grid = vec![
        vec![text("รายงานค่าไฟฟ้ารายเดือน")],
        vec![Cell::Empty],
        billing_header(),
    ];
    grid.extend(rows);
    grid
}

pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let mut workbook = Workbook::new();
    for (name, grid) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r as u32, c as u16, s).unwrap();
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Cell::Empty => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Workbook with one `sheet` holding `rows` under the standard header
pub fn billing_file(dir: &Path, file_name: &str, sheet: &str, rows: Vec<Vec<Cell>>) -> PathBuf {
    let path = dir.join(file_name);
    write_workbook(&path, &[(sheet, billing_sheet(rows))]);
    path
}
