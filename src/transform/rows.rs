//! Row transformer: one wide billing row → twelve monthly records

use super::calendar::{amount_column, quantity_column, THAI_MONTHS};
use crate::excel::{SheetTable, SENTINEL_COLUMN};
use crate::types::BillingRecord;
use calamine::Data;
use regex::Regex;
use std::sync::OnceLock;

pub const DEVICE_COLUMN: &str = "deviceNumber";

const UNKNOWN_REGION: &str = "Unknown";

/// Expand every data row of `table` into one record per month
pub fn transform_rows(table: &SheetTable, year: i32, province: Option<&str>) -> Vec<BillingRecord> {
    let mut records = Vec::with_capacity(table.row_count() * THAI_MONTHS.len());

    for row in table.rows() {
        let electricity_number = row.text(SENTINEL_COLUMN);
        let device_number = row.text(DEVICE_COLUMN);

        for (month_name, month) in THAI_MONTHS {
            records.push(BillingRecord {
                province: province.map(str::to_string),
                electricity_number: electricity_number.clone(),
                device_number: device_number.clone(),
                year,
                month,
                baht: numeric_value(row.get(&amount_column(month_name))),
                unit: numeric_value(row.get(&quantity_column(month_name))),
            });
        }
    }

    records
}

/// Numeric value of a cell, 0 for anything that is not a finite number
pub fn numeric_value(cell: Option<&Data>) -> f64 {
    let value = match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => parse_decimal(s).unwrap_or(0.0),
        _ => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn leading_decimal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("static regex")
    })
}

/// Leading decimal of a text cell, allowing thousands separators
///
/// Trailing text such as a unit is ignored: `"150.5 บาท"` reads as 150.5.
fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    leading_decimal()
        .find(&cleaned)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

fn region_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[_\-\s]").expect("static regex"))
}

/// Region label from an upload name: first token of the stem
///
/// `Chiangmai_2566.xlsx` → `Chiangmai`. Names without an extension have
/// an empty stem and map to `Unknown`.
pub fn region_from_filename(file_name: &str) -> String {
    let stem = file_name
        .rfind('.')
        .map(|dot| &file_name[..dot])
        .unwrap_or_default();

    match region_separator().split(stem).next() {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => UNKNOWN_REGION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn billing_table(rows: Vec<Vec<Data>>) -> SheetTable {
        let mut header = vec![s("electricityNumber"), s("deviceNumber")];
        for (month_name, _) in THAI_MONTHS {
            header.push(s(&amount_column(month_name)));
            header.push(s(&quantity_column(month_name)));
        }
        let mut grid = vec![header];
        grid.extend(rows);
        SheetTable::from_rows("data_2566", &grid)
    }

    #[test]
    fn test_each_row_yields_twelve_months() {
        let table = billing_table(vec![
            vec![s("020001"), s("D-1")],
            vec![s("020002"), s("D-2")],
        ]);
        let records = transform_rows(&table, 2023, None);

        assert_eq!(records.len(), 24);
        for chunk in records.chunks(12) {
            let months: Vec<u32> = chunk.iter().map(|r| r.month).collect();
            assert_eq!(months, (1..=12).collect::<Vec<_>>());
        }
        assert_eq!(records[12].electricity_number, "020002");
    }

    #[test]
    fn test_amounts_land_in_their_month() {
        // columns: id, device, baht ม.ค., unit ม.ค., baht ก.พ., unit ก.พ.
        let table = billing_table(vec![vec![
            s("020001"),
            s("D-1"),
            s("150.5"),
            Data::Int(42),
            Data::Float(99.25),
            s("1,200"),
        ]]);
        let records = transform_rows(&table, 2023, Some("Chiangmai"));

        assert_eq!(records[0].baht, 150.5);
        assert_eq!(records[0].unit, 42.0);
        assert_eq!(records[1].baht, 99.25);
        assert_eq!(records[1].unit, 1200.0);
        assert!(records[2..].iter().all(|r| r.baht == 0.0 && r.unit == 0.0));
        assert!(records
            .iter()
            .all(|r| r.province.as_deref() == Some("Chiangmai") && r.year == 2023));
    }

    #[test]
    fn test_missing_identifiers_are_empty() {
        let table = billing_table(vec![vec![Data::Empty, Data::Empty, s("5")]]);
        let records = transform_rows(&table, 2023, None);
        assert_eq!(records.len(), 12);
        assert_eq!(records[0].electricity_number, "");
        assert_eq!(records[0].device_number, "");
        assert_eq!(records[0].province, None);
    }

    #[test]
    fn test_numeric_value_defaults_to_zero() {
        assert_eq!(numeric_value(None), 0.0);
        assert_eq!(numeric_value(Some(&Data::Empty)), 0.0);
        assert_eq!(numeric_value(Some(&s("n/a"))), 0.0);
        assert_eq!(numeric_value(Some(&s("   "))), 0.0);
        assert_eq!(numeric_value(Some(&Data::Bool(true))), 0.0);
        assert_eq!(numeric_value(Some(&s("NaN"))), 0.0);
        assert_eq!(numeric_value(Some(&s("inf"))), 0.0);
        assert_eq!(numeric_value(Some(&Data::Float(f64::NAN))), 0.0);
    }

    #[test]
    fn test_numeric_value_parses_text() {
        assert_eq!(numeric_value(Some(&s(" 12.75 "))), 12.75);
        assert_eq!(numeric_value(Some(&s("-3"))), -3.0);
        assert_eq!(numeric_value(Some(&s("12,345.5"))), 12345.5);
    }

    #[test]
    fn test_numeric_value_keeps_leading_number() {
        assert_eq!(numeric_value(Some(&s("150.5 บาท"))), 150.5);
        assert_eq!(numeric_value(Some(&s("12 kWh"))), 12.0);
        assert_eq!(numeric_value(Some(&s("1,200 บาท"))), 1200.0);
        assert_eq!(numeric_value(Some(&s(".5"))), 0.5);
        assert_eq!(numeric_value(Some(&s("7."))), 7.0);
        assert_eq!(numeric_value(Some(&s("2e3x"))), 2000.0);
        assert_eq!(numeric_value(Some(&s("บาท 150"))), 0.0);
        assert_eq!(numeric_value(Some(&s("1e999"))), 0.0);
    }

    #[test]
    fn test_region_from_filename() {
        assert_eq!(region_from_filename("Chiangmai_2566.xlsx"), "Chiangmai");
        assert_eq!(region_from_filename("Lampang-report.xls"), "Lampang");
        assert_eq!(region_from_filename("Nan report.xlsx"), "Nan");
        assert_eq!(region_from_filename("Phrae.v2.xlsx"), "Phrae.v2");
    }

    #[test]
    fn test_region_unknown_for_empty_token() {
        assert_eq!(region_from_filename("_2566.xlsx"), "Unknown");
        assert_eq!(region_from_filename("noextension"), "Unknown");
    }
}
