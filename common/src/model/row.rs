use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scalar taken from the tabular data source.
///
/// Workbook readers hand over a mix of strings, floats (integers coerced to
/// `101.0`), blanks and already-parsed dates. The CSV reader only ever produces
/// `Text` and `Blank`, so leading zeros in codes survive untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Blank,
    Number(f64),
    Text(String),
    #[serde(skip_deserializing)]
    Date(NaiveDate),
}

impl CellValue {
    /// Builds a cell from raw text, mapping empty or whitespace-only input to `Blank`.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Date(_) => false,
        }
    }

    /// Display form of the value, or `None` when the cell is blank.
    ///
    /// Integral floats print without a fractional part (`32.0` -> `"32"`).
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            CellValue::Blank => None,
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from_text(&value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// One untyped input record: field name -> cell.
///
/// Missing fields and blank cells are equivalent for every consumer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(BTreeMap<String, CellValue>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builder-style `insert`, handy for fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.0.get(field)
    }

    /// Non-blank display text of a field.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(CellValue::as_text)
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_blank())
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRow(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
