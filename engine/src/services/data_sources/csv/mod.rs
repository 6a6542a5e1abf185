//! CSV-backed row source.
//!
//! - `load`: reads a CSV data file into `RawRow`s, detecting the delimiter and
//!   normalizing header titles so `Branch Code` and `branch_code` match.
//! - `sample`: writes the blank data template handed to operators.

mod load;
mod sample;

pub use load::{detect_delimiter, normalize_cell, normalize_title, CsvRowSource};
pub use sample::{write_sample_csv, SAMPLE_HEADERS, SAMPLE_ROWS};
