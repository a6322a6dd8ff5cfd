//! EMS - electricity billing workbook converter
//!
//! Reads Thai monthly billing workbooks (one row per meter, `baht <month>`
//! and `unit <month>` columns), reshapes every row into one record per
//! calendar month and exports the records as CSV or Excel.
//!
//! # Example
//!
//! ```no_run
//! use ems_convert::transform::Converter;
//! use ems_convert::types::{ConvertOptions, ProcessMode};
//! use std::path::Path;
//!
//! let mut options = ConvertOptions::new(vec!["data_2566".to_string()]);
//! options.process_mode = ProcessMode::Combined;
//!
//! let converter = Converter::new(options);
//! let results = converter.convert(&["north.xlsx", "south.xlsx"])?;
//!
//! for result in &results {
//!     for artifact in &result.artifacts {
//!         artifact.write_to(Path::new("out"))?;
//!     }
//! }
//! # Ok::<(), ems_convert::error::EmsError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod transform;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{EmsError, EmsResult};
pub use transform::Converter;
pub use types::{BillingRecord, ConversionResult, ConvertOptions, OutputFormat, ProcessMode};
