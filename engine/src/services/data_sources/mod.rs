//! Row providers for the certificate engine.
//!
//! The engine never reads spreadsheets itself; it asks a `RowSource` for
//! already-split rows. `csv` and `xlsx` are the file-backed providers, and any
//! `Vec<RawRow>` is an in-memory one.

pub mod csv;
pub mod xlsx;

use crate::error::EngineError;
use common::model::row::RawRow;
use std::path::Path;

/// Extensions read through the workbook reader; everything else is CSV.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Supplies the tabular rows of one generation request.
pub trait RowSource {
    fn load_rows(&self) -> Result<Vec<RawRow>, EngineError>;
}

impl RowSource for Vec<RawRow> {
    fn load_rows(&self) -> Result<Vec<RawRow>, EngineError> {
        Ok(self.clone())
    }
}

impl RowSource for [RawRow] {
    fn load_rows(&self) -> Result<Vec<RawRow>, EngineError> {
        Ok(self.to_vec())
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Picks the reader for a data file by its extension.
pub fn row_source_for(path: &Path) -> Box<dyn RowSource> {
    if is_workbook(path) {
        Box::new(xlsx::XlsxRowSource::new(path))
    } else {
        Box::new(csv::CsvRowSource::new(path))
    }
}

/// Writes the data template as a workbook for `.xlsx` paths, CSV otherwise.
pub fn write_sample(path: &Path) -> Result<(), EngineError> {
    if is_workbook(path) {
        xlsx::write_sample_xlsx(path)
    } else {
        csv::write_sample_csv(path)
    }
}
