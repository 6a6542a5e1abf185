use crate::error::EngineError;
use crate::services::data_sources::csv::{normalize_cell, normalize_title};
use crate::services::data_sources::RowSource;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use common::model::row::{CellValue, RawRow};
use log::debug;
use std::path::{Path, PathBuf};

/// Reads branch rows from the first worksheet of a workbook.
///
/// The first row holds the titles. Rows with no value in any titled column
/// are dropped, so trailing formatted-but-empty rows do not become data
/// errors.
#[derive(Debug, Clone)]
pub struct XlsxRowSource {
    path: PathBuf,
}

impl XlsxRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for XlsxRowSource {
    fn load_rows(&self) -> Result<Vec<RawRow>, EngineError> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| EngineError::Invalid(format!("{} has no worksheet", self.path.display())))??;

        let mut lines = range.rows();
        let titles: Vec<String> = match lines.next() {
            Some(header) => header
                .iter()
                .map(|cell| normalize_title(&cell.to_string()))
                .collect(),
            None => Vec::new(),
        };
        if titles.iter().all(|t| t.is_empty()) {
            return Err(EngineError::Invalid(format!(
                "{} has no header row",
                self.path.display()
            )));
        }

        let mut rows = Vec::new();
        let mut dropped = 0;
        for line in lines {
            let row: RawRow = titles
                .iter()
                .zip(line.iter())
                .filter(|(title, _)| !title.is_empty())
                .map(|(title, cell)| (title.clone(), cell_value(cell)))
                .collect();
            if titles
                .iter()
                .filter(|t| !t.is_empty())
                .all(|t| !row.is_present(t))
            {
                dropped += 1;
                continue;
            }
            rows.push(row);
        }
        debug!(
            "Loaded {} rows from {} ({} empty row(s) dropped)",
            rows.len(),
            self.path.display(),
            dropped
        );
        Ok(rows)
    }
}

/// Maps one worksheet cell onto the engine's cell model.
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Blank,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::from_text(&normalize_cell(s)),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::from_text(s)),
        Data::DurationIso(s) => CellValue::from_text(s),
        Data::Error(e) => {
            debug!("Spreadsheet cell error {:?} read as blank", e);
            CellValue::Blank
        }
    }
}
