use crate::error::RowError;
use chrono::{Months, NaiveDate, NaiveDateTime};
use common::model::row::CellValue;

/// Length of the warranty, in calendar months.
pub const WARRANTY_MONTHS: u32 = 36;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Installation date and the derived warranty expiry of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarrantyPeriod {
    pub installed: NaiveDate,
    pub expires: NaiveDate,
    /// The installation date was absent or unreadable and `today` was used.
    pub fell_back: bool,
}

impl WarrantyPeriod {
    /// Computes the period from a raw cell. Unreadable or absent dates fall
    /// back to `today`; the caller decides whether to report that.
    pub fn from_cell(raw: Option<&CellValue>, today: NaiveDate) -> Result<Self, RowError> {
        let parsed = raw.and_then(parse_installation_date);
        let installed = parsed.unwrap_or(today);
        Ok(Self {
            installed,
            expires: expiry_for(installed)?,
            fell_back: parsed.is_none(),
        })
    }

    pub fn installed_display(&self) -> String {
        format_date(self.installed)
    }

    pub fn expires_display(&self) -> String {
        format_date(self.expires)
    }
}

/// `installed + 36 months`, clamped to the end of a shorter target month.
pub fn expiry_for(installed: NaiveDate) -> Result<NaiveDate, RowError> {
    installed
        .checked_add_months(Months::new(WARRANTY_MONTHS))
        .ok_or(RowError::DateOutOfRange(installed))
}

/// Accepts structured dates and `YYYY-MM-DD` / `DD-MM-YYYY` text (a trailing
/// time of day, as spreadsheet exports write it, is ignored). Numbers are not
/// dates.
pub fn parse_installation_date(raw: &CellValue) -> Option<NaiveDate> {
    match raw {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_text(s.trim()),
        CellValue::Number(_) | CellValue::Blank => None,
    }
}

fn parse_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// `DD-MM-YYYY`, the form printed on certificates.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
