use serde::{Deserialize, Serialize};

/// Outcome of checking one expected photo before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoStatus {
    Ready,
    Missing,
    /// The row itself could not be interpreted; no photo was looked up.
    DataError,
}

/// One line of the pre-flight report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    /// 0-based position of the source row.
    pub row_index: usize,
    pub branch: String,
    pub variant_label: String,
    pub expected_key: String,
    pub status: PhotoStatus,
    /// Reason for a `DataError` entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ValidationEntry {
    /// File name an operator is expected to upload for this entry.
    pub fn expected_photo(&self) -> String {
        if self.expected_key.is_empty() {
            String::new()
        } else {
            format!("{}.jpg", self.expected_key)
        }
    }
}

/// Pre-flight report over a whole data set, in input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
}

impl ValidationReport {
    /// Number of variant-level items whose photo is available.
    pub fn ready_count(&self) -> usize {
        self.count(PhotoStatus::Ready)
    }

    pub fn missing_count(&self) -> usize {
        self.count(PhotoStatus::Missing)
    }

    pub fn data_error_count(&self) -> usize {
        self.count(PhotoStatus::DataError)
    }

    /// Variant-level items only; data-error rows are not counted.
    pub fn expected_count(&self) -> usize {
        self.ready_count() + self.missing_count()
    }

    pub fn all_ready(&self) -> bool {
        self.missing_count() == 0 && self.data_error_count() == 0
    }

    /// `"N/Total ready"`.
    pub fn summary(&self) -> String {
        format!("{}/{} ready", self.ready_count(), self.expected_count())
    }

    fn count(&self, status: PhotoStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
