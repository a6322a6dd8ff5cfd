//! Excel exporter implementation

use crate::error::EmsResult;
use crate::types::{record_headers, BillingRecord};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// Name of the single worksheet in every exported workbook
pub const SHEET_NAME: &str = "TransformedData";

/// Excel exporter for transformed billing records
pub struct ExcelExporter {
    include_region: bool,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(include_region: bool) -> Self {
        Self { include_region }
    }

    /// Render records into an in-memory .xlsx workbook
    pub fn export_to_buffer(&self, records: &[BillingRecord]) -> EmsResult<Vec<u8>> {
        let mut workbook = self.build_workbook(records)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build_workbook(&self, records: &[BillingRecord]) -> EmsResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, header) in record_headers(self.include_region).iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            self.write_record(worksheet, (idx + 1) as u32, record)?;
        }

        Ok(workbook)
    }

    fn write_record(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        record: &BillingRecord,
    ) -> EmsResult<()> {
        let mut col: u16 = 0;
        if self.include_region {
            worksheet.write_string(row, col, record.province.as_deref().unwrap_or_default())?;
            col += 1;
        }

        worksheet.write_string(row, col, &record.electricity_number)?;
        worksheet.write_string(row, col + 1, &record.device_number)?;
        worksheet.write_number(row, col + 2, record.year)?;
        worksheet.write_number(row, col + 3, record.month)?;
        worksheet.write_number(row, col + 4, record.baht)?;
        worksheet.write_number(row, col + 5, record.unit)?;

        Ok(())
    }
}
