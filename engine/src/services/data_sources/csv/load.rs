use crate::error::EngineError;
use crate::services::data_sources::RowSource;
use common::model::row::{CellValue, RawRow};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Reads branch rows from a CSV file.
///
/// Cells are kept as text, so `0042` stays `0042`; empty cells become blank.
#[derive(Debug, Clone)]
pub struct CsvRowSource {
    path: PathBuf,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvRowSource {
    fn load_rows(&self) -> Result<Vec<RawRow>, EngineError> {
        let delimiter = {
            let mut reader = BufReader::new(File::open(&self.path)?);
            let mut header_line = String::new();
            reader.read_line(&mut header_line)?;
            detect_delimiter(header_line.trim_end_matches(&['\n', '\r'][..]))
        };

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .flexible(true)
            .from_path(&self.path)?;
        let titles: Vec<String> = reader.headers()?.iter().map(normalize_title).collect();
        if titles.iter().all(|t| t.is_empty()) {
            return Err(EngineError::Invalid(format!(
                "{} has no header row",
                self.path.display()
            )));
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            match record {
                Ok(record) => {
                    let row: RawRow = titles
                        .iter()
                        .zip(record.iter())
                        .filter(|(title, _)| !title.is_empty())
                        .map(|(title, cell)| (title.clone(), CellValue::from_text(&normalize_cell(cell))))
                        .collect();
                    rows.push(row);
                }
                Err(e) => {
                    // Keep the slot so row numbers stay aligned; the empty row
                    // surfaces later as a data error.
                    warn!("Unreadable CSV record {} in {}: {}", i + 2, self.path.display(), e);
                    rows.push(RawRow::new());
                }
            }
        }
        debug!(
            "Loaded {} rows from {} (delimiter {:?})",
            rows.len(),
            self.path.display(),
            delimiter
        );
        Ok(rows)
    }
}

/// Picks the candidate delimiter that occurs most often in the header line.
pub fn detect_delimiter(header_line: &str) -> char {
    CANDIDATE_DELIMITERS
        .iter()
        .max_by_key(|&&d| header_line.matches(d).count())
        .copied()
        .filter(|&d| header_line.contains(d))
        .unwrap_or(',')
}

/// Strips surrounding quotes and non-breaking spaces from a cell.
pub fn normalize_cell(cell: &str) -> String {
    let s = cell.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    s.replace('\u{00A0}', " ").trim().to_string()
}

/// `" Branch Code "` -> `"branch_code"`.
pub fn normalize_title(title: &str) -> String {
    normalize_cell(title.trim_start_matches('\u{feff}'))
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
