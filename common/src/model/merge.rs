use crate::model::document::GeneratedDocument;
use serde::{Deserialize, Serialize};

/// A row the bulk run skipped, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 0-based position of the row in the data source.
    pub row_index: usize,
    /// Normalized branch code, when the row got far enough to have one.
    pub branch_code: Option<String>,
    pub reason: String,
}

/// Serializable outcome of one bulk run.
///
/// Both lists keep input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub produced: Vec<GeneratedDocument>,
    pub skipped: Vec<SkippedRow>,
}

impl MergeSummary {
    pub fn total_rows(&self) -> usize {
        self.produced.len() + self.skipped.len()
    }
}
