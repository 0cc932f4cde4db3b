//! Errors raised while turning a report into a file.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{rows} rows do not fit in a worksheet (max {max})")]
    TooManyRows { rows: usize, max: usize },
}
