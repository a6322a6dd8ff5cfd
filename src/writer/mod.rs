//! Text and archive writers for transformed records

mod bundle;

pub use bundle::bundle_zip;

use crate::error::{EmsError, EmsResult};
use crate::types::{record_headers, BillingRecord};

/// UTF-8 byte order mark, so spreadsheet apps detect the encoding of Thai text
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Render records as CSV: BOM, header row, one line per record
pub fn records_to_csv(records: &[BillingRecord], include_region: bool) -> EmsResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(64 + records.len() * 48);
    buffer.extend_from_slice(UTF8_BOM.as_bytes());

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    wtr.write_record(record_headers(include_region))?;
    for record in records {
        wtr.write_record(record_fields(record, include_region))?;
    }

    wtr.into_inner().map_err(|e| EmsError::Io(e.into_error()))
}

fn record_fields(record: &BillingRecord, include_region: bool) -> Vec<String> {
    let mut fields = Vec::with_capacity(7);
    if include_region {
        fields.push(record.province.clone().unwrap_or_default());
    }
    fields.push(record.electricity_number.clone());
    fields.push(record.device_number.clone());
    fields.push(record.year.to_string());
    fields.push(record.month.to_string());
    fields.push(format_number(record.baht));
    fields.push(format_number(record.unit));
    fields
}

/// Shortest decimal form: `150.5`, `12`, `0`
fn format_number(n: f64) -> String {
    if n == 0.0 {
        // also folds -0.0
        return "0".to_string();
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(province: Option<&str>, baht: f64) -> BillingRecord {
        BillingRecord {
            province: province.map(str::to_string),
            electricity_number: "020001".to_string(),
            device_number: "D-1".to_string(),
            year: 2023,
            month: 1,
            baht,
            unit: 12.0,
        }
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_csv_starts_with_bom_and_header() {
        let text = as_text(records_to_csv(&[record(Some("Nan"), 150.5)], true).unwrap());
        assert!(text.starts_with("\u{FEFF}Province,electricityNumber,deviceNumber,Year,Month,Baht,Unit\n"));
        assert_eq!(text.lines().nth(1), Some("Nan,020001,D-1,2023,1,150.5,12"));
    }

    #[test]
    fn test_csv_without_region() {
        let text = as_text(records_to_csv(&[record(Some("Nan"), 0.0)], false).unwrap());
        assert_eq!(
            text,
            "\u{FEFF}electricityNumber,deviceNumber,Year,Month,Baht,Unit\n020001,D-1,2023,1,0,12\n"
        );
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let text = as_text(records_to_csv(&[], false).unwrap());
        assert_eq!(
            text,
            "\u{FEFF}electricityNumber,deviceNumber,Year,Month,Baht,Unit\n"
        );
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        let mut rec = record(None, 1.0);
        rec.device_number = "D-1, spare".to_string();
        let text = as_text(records_to_csv(&[rec], false).unwrap());
        assert!(text.contains(",\"D-1, spare\","));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(150.5), "150.5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-0.0), "0");
    }
}
