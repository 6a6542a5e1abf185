//! Spreadsheet-backed row source.
//!
//! - `load`: reads the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
//!   Numeric cells stay numbers (a code typed as `101` arrives as `101.0`) and
//!   date-formatted cells arrive as dates.
//! - `sample`: writes the data template as a workbook with typed cells.

mod load;
mod sample;

pub use load::XlsxRowSource;
pub use sample::write_sample_xlsx;
