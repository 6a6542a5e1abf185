use crate::services::certificates::branch::BranchRow;
use crate::services::certificates::variants::detect_variants;
use crate::services::photos::keys;
use common::model::row::RawRow;
use common::model::validation::{PhotoStatus, ValidationEntry, ValidationReport};
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Branch shown for rows whose code could not be read at all.
const UNREADABLE_BRANCH: &str = "Error";

/// Pre-flight check of which expected photos are present.
///
/// Every detected variant of every row yields one entry; a row that cannot be
/// parsed yields a single `DataError` entry and the check moves on. Only the
/// specific `{branch}_{type_id}` key counts as ready, so a `Ready` entry always
/// resolves during generation.
pub fn validate(rows: &[RawRow], available: &BTreeSet<String>) -> ValidationReport {
    let per_row: Vec<Vec<ValidationEntry>> = rows
        .par_iter()
        .enumerate()
        .map(|(row_index, raw)| validate_row(row_index, raw, available))
        .collect();

    let report = ValidationReport {
        entries: per_row.into_iter().flatten().collect(),
    };
    debug!(
        "Validated {} row(s): {}, {} data error(s)",
        rows.len(),
        report.summary(),
        report.data_error_count()
    );
    report
}

fn validate_row(row_index: usize, raw: &RawRow, available: &BTreeSet<String>) -> Vec<ValidationEntry> {
    let branch = match BranchRow::parse(raw) {
        Ok(branch) => branch,
        Err(e) => {
            return vec![ValidationEntry {
                row_index,
                branch: raw
                    .text("branch_code")
                    .unwrap_or_else(|| UNREADABLE_BRANCH.to_string()),
                variant_label: String::new(),
                expected_key: String::new(),
                status: PhotoStatus::DataError,
                detail: Some(e.to_string()),
            }]
        }
    };

    detect_variants(&branch)
        .into_iter()
        .map(|variant| {
            let expected_key = keys::expected_key(&branch.branch_code, variant.kind);
            let status = if available.contains(&expected_key) {
                PhotoStatus::Ready
            } else {
                PhotoStatus::Missing
            };
            ValidationEntry {
                row_index,
                branch: branch.branch_code.clone(),
                variant_label: variant.kind.label().to_string(),
                expected_key,
                status,
                detail: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::photos::PhotoPool;
    use common::model::variant::VariantKind;

    fn available(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| keys::normalize(n)).collect()
    }

    fn row(code: &str) -> RawRow {
        RawRow::new().with("branch_code", code)
    }

    #[test]
    fn one_entry_per_detected_variant() {
        let rows = vec![row("101.0")
            .with("complete_board_size", "8x4")
            .with("fascia_+_led_replacement_size", "6x3")];
        let report = validate(&rows, &available(&["101_1.jpg"]));

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].expected_key, "101_1");
        assert_eq!(report.entries[0].status, PhotoStatus::Ready);
        assert_eq!(report.entries[0].variant_label, "1 (Complete)");
        assert_eq!(report.entries[1].expected_photo(), "101_3.jpg");
        assert_eq!(report.entries[1].status, PhotoStatus::Missing);
        assert_eq!(report.summary(), "1/2 ready");
    }

    #[test]
    fn bare_branch_photo_does_not_count_as_ready() {
        let rows = vec![row("101").with("complete_board_size", "8x4")];
        let report = validate(&rows, &available(&["101.jpg"]));
        assert_eq!(report.entries[0].status, PhotoStatus::Missing);
    }

    #[test]
    fn bad_rows_yield_one_data_error_and_the_check_continues() {
        let rows = vec![
            row("ABC").with("complete_board_size", "8x4"),
            RawRow::new().with("complete_board_size", "8x4"),
            row("102").with("only_fascia_replacement_size", "10x5"),
        ];
        let report = validate(&rows, &available(&["102_2.png"]));

        let statuses: Vec<PhotoStatus> = report.entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![PhotoStatus::DataError, PhotoStatus::DataError, PhotoStatus::Ready]
        );
        assert_eq!(report.entries[0].branch, "ABC");
        assert_eq!(report.entries[1].branch, "Error");
        assert!(report.entries[1].detail.is_some());
        // Data errors are rows, not expected photos.
        assert_eq!(report.summary(), "1/1 ready");
        assert!(!report.all_ready());
    }

    #[test]
    fn order_follows_input_rows() {
        let rows: Vec<RawRow> = (1..=40)
            .map(|i| row(&i.to_string()).with("complete_board_size", "8x4"))
            .collect();
        let report = validate(&rows, &BTreeSet::new());
        let indexes: Vec<usize> = report.entries.iter().map(|e| e.row_index).collect();
        assert_eq!(indexes, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn ready_entries_always_resolve() {
        let files = ["in/101_1.jpg", "in/101.png", "in/102_3.JPG"];
        let pool: PhotoPool = files.into_iter().collect();
        let rows = vec![
            row("101")
                .with("complete_board_size", "8x4")
                .with("only_fascia_replacement_size", "10x5"),
            row("102").with("fascia_+_led_replacement_size", "6x3"),
        ];
        let report = validate(&rows, &pool.keys());

        for entry in report.entries.iter().filter(|e| e.status == PhotoStatus::Ready) {
            let kind = VariantKind::ALL
                .into_iter()
                .find(|k| k.label() == entry.variant_label)
                .unwrap();
            assert!(pool.resolve(&entry.branch, kind).is_some());
        }
        assert_eq!(report.ready_count(), 2);
    }
}
