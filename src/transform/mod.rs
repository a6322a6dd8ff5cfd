//! Billing transformation pipeline
//!
//! Header-keyed sheet rows → monthly records → per-file or combined
//! artifacts.

pub mod calendar;
mod pipeline;
mod rows;

pub use calendar::{report_year, BUDDHIST_ERA_OFFSET, THAI_MONTHS};
pub use pipeline::{is_excel_file_name, process_file, Converter};
pub use rows::{numeric_value, region_from_filename, transform_rows, DEVICE_COLUMN};
