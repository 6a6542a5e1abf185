use crate::error::GenerationError;
use common::model::document::GeneratedDocument;
use common::model::merge::{MergeSummary, SkippedRow};
use std::path::Path;

/// What happened to one input row.
#[derive(Debug)]
pub struct RowOutcome {
    /// 0-based position of the row in the data source.
    pub row_index: usize,
    /// Normalized branch code, when the row had a readable one.
    pub branch_code: Option<String>,
    /// The installation date was unreadable and the run date was used.
    pub date_fell_back: bool,
    pub result: Result<GeneratedDocument, GenerationError>,
}

impl RowOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn document(&self) -> Option<&GeneratedDocument> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&GenerationError> {
        self.result.as_ref().err()
    }
}

/// Per-row outcomes of one bulk run, in input row order.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BulkReport {
    /// Paths of the certificates confirmed on disk.
    pub fn produced_paths(&self) -> Vec<&Path> {
        self.documents().into_iter().map(|d| d.path.as_path()).collect()
    }

    pub fn documents(&self) -> Vec<&GeneratedDocument> {
        self.outcomes.iter().filter_map(RowOutcome::document).collect()
    }

    pub fn failures(&self) -> Vec<&RowOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }

    pub fn produced_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.produced_count() == 0
    }

    /// Serializable form, with errors flattened to their messages.
    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            produced: self.documents().into_iter().cloned().collect(),
            skipped: self
                .outcomes
                .iter()
                .filter_map(|o| {
                    o.error().map(|e| SkippedRow {
                        row_index: o.row_index,
                        branch_code: o.branch_code.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use std::path::PathBuf;

    fn produced(row_index: usize, code: &str) -> RowOutcome {
        RowOutcome {
            row_index,
            branch_code: Some(code.to_string()),
            date_fell_back: false,
            result: Ok(GeneratedDocument {
                path: PathBuf::from(format!("out/Certificate_{}_X.pdf", code)),
                branch_code: code.to_string(),
                branch_name: "X".to_string(),
            }),
        }
    }

    #[test]
    fn summary_splits_produced_and_skipped() {
        let report = BulkReport {
            outcomes: vec![
                produced(0, "101"),
                RowOutcome {
                    row_index: 1,
                    branch_code: None,
                    date_fell_back: false,
                    result: Err(RowError::MissingBranchCode.into()),
                },
                produced(2, "103"),
            ],
        };

        assert_eq!(
            report.produced_paths(),
            vec![
                Path::new("out/Certificate_101_X.pdf"),
                Path::new("out/Certificate_103_X.pdf")
            ]
        );
        assert_eq!(report.failures().len(), 1);

        let summary = report.summary();
        assert_eq!(summary.total_rows(), 3);
        assert_eq!(summary.skipped[0].row_index, 1);
        assert_eq!(summary.skipped[0].reason, "branch code is missing");
    }

    #[test]
    fn empty_report_is_empty() {
        let report = BulkReport::default();
        assert!(report.is_empty());
        assert!(report.produced_paths().is_empty());
    }
}
