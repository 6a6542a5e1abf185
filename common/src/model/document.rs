use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A certificate written to disk for one branch row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub branch_code: String,
    pub branch_name: String,
}
