//! CLI command handlers

pub mod commands;

pub use commands::{
    convert, resolve_sheets, run_conversion, sheets, ConversionReport, ConvertArgs,
};
