use thiserror::Error;

pub type EmsResult<T> = Result<T, EmsError>;

#[derive(Error, Debug)]
pub enum EmsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read Excel file: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Excel export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not an Excel file (.xls/.xlsx): {0}")]
    NotExcel(String),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Header row (electricityNumber) not found in sheet '{0}'")]
    HeaderNotFound(String),

    #[error("No sheet is common to all input files")]
    NoCommonSheet,

    #[error("Several common sheets found, select with --sheet: {}", .0.join(", "))]
    AmbiguousSheet(Vec<String>),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("All {0} input files failed to convert")]
    AllFilesFailed(usize),
}
