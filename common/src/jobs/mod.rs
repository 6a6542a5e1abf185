use serde::{Deserialize, Serialize};

/// Lifecycle of one bulk generation run, as reported to a progress sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Percentage of rows processed so far (0-100).
    InProgress(u32),
    Completed(String),
    Failed(String),
}
