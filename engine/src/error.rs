use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// A row whose fields cannot be interpreted. The row is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("branch code is missing")]
    MissingBranchCode,
    #[error("branch code '{0}' is not numeric")]
    InvalidBranchCode(String),
    #[error("warranty expiry for installation date {0} is out of range")]
    DateOutOfRange(NaiveDate),
}

/// Composition or rendering of one certificate failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no usable font family found (tried {0})")]
    FontNotFound(String),
    #[error("pdf error: {0}")]
    Pdf(#[from] genpdf::error::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("png encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("renderer reported success but {} does not exist", .0.display())]
    OutputMissing(PathBuf),
}

/// Why a single row produced no certificate.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Failures outside the per-row boundary: loading inputs, staging photos,
/// writing the archive or a sample sheet.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}
