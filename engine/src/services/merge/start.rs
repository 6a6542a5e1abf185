//! # Bulk Certificate Generation
//!
//! `CertificateEngine` runs the per-row pipeline over a whole data set:
//!
//! 1.  **Row parsing**: the raw row becomes a `BranchRow`; an unreadable branch
//!     code is a `RowError` and the row is skipped.
//!
//! 2.  **Variant detection and dates**: the coverage variants are detected and
//!     the 36-month warranty period computed. An unreadable installation date
//!     falls back to the engine's reference date and is logged.
//!
//! 3.  **Composition**: photos are resolved and the `CertificateLayout` built.
//!
//! 4.  **Rendering**: the layout is handed to the `CertificateRenderer` and the
//!     output file is checked to exist.
//!
//! 5.  **Progress Reporting**: after every row a `JobStatus::InProgress`
//!     percentage is sent to the optional progress sink, followed by a final
//!     `Completed` or `Failed`.
//!
//! Every row is isolated: whatever fails, the run continues with the next row
//! and the failure is recorded in the `BulkReport`.

use crate::error::{EngineError, GenerationError, RenderError, RowError};
use crate::services::certificates::branch::{BranchRow, UNKNOWN_BRANCH_NAME};
use crate::services::certificates::dates::WarrantyPeriod;
use crate::services::certificates::layout::{self, CertificateLayout};
use crate::services::certificates::pdf::CertificateRenderer;
use crate::services::certificates::variants::detect_variants;
use crate::services::data_sources::RowSource;
use crate::services::merge::report::{BulkReport, RowOutcome};
use crate::services::photos::{verify, PhotoPool, PhotoSource};
use chrono::{Local, NaiveDate};
use common::jobs::JobStatus;
use common::model::branding::BrandingConfig;
use common::model::document::GeneratedDocument;
use common::model::row::RawRow;
use common::model::validation::ValidationReport;
use log::{info, warn};
use std::path::Path;

/// A row that passed parsing, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedRow {
    pub branch: BranchRow,
    pub period: WarrantyPeriod,
    pub layout: CertificateLayout,
}

/// Drives certificate generation for a batch of rows.
///
/// The engine holds no mutable state; concurrent runs only need distinct
/// output directories.
pub struct CertificateEngine<R> {
    renderer: R,
    today: NaiveDate,
}

impl<R: CertificateRenderer> CertificateEngine<R> {
    /// Uses the local date as the fallback for unreadable installation dates.
    pub fn new(renderer: R) -> Self {
        Self::with_today(renderer, Local::now().date_naive())
    }

    pub fn with_today(renderer: R, today: NaiveDate) -> Self {
        Self { renderer, today }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Pre-flight photo report for `rows` against the photos in `photos`.
    pub fn validate(&self, rows: &[RawRow], photos: &PhotoPool) -> ValidationReport {
        verify::validate(rows, &photos.keys())
    }

    /// Parses one row and builds its certificate plan without rendering it.
    pub fn compose_row(
        &self,
        row_index: usize,
        raw: &RawRow,
        photos: &PhotoPool,
        branding: &BrandingConfig,
    ) -> Result<ComposedRow, RowError> {
        let branch = BranchRow::parse(raw)?;
        let variants = detect_variants(&branch);
        let period = WarrantyPeriod::from_cell(branch.installation_date.as_ref(), self.today)?;
        if period.fell_back {
            warn!(
                "Row {} (branch {}): installation date {:?} unreadable, using {}",
                row_index + 1,
                branch.branch_code,
                branch.installation_date,
                period.installed_display()
            );
        }
        let layout = layout::compose(&branch, &variants, &period, photos, branding);
        Ok(ComposedRow {
            branch,
            period,
            layout,
        })
    }

    /// Generates the certificate of one row into `output_dir`. Never panics
    /// or propagates; the outcome carries the error instead.
    pub fn generate_one(
        &self,
        row_index: usize,
        raw: &RawRow,
        photos: &PhotoPool,
        output_dir: &Path,
        branding: &BrandingConfig,
    ) -> RowOutcome {
        let composed = match self.compose_row(row_index, raw, photos, branding) {
            Ok(composed) => composed,
            Err(e) => {
                return RowOutcome {
                    row_index,
                    branch_code: None,
                    date_fell_back: false,
                    result: Err(e.into()),
                }
            }
        };

        let result = self.render_composed(&composed, output_dir);
        RowOutcome {
            row_index,
            branch_code: Some(composed.branch.branch_code),
            date_fell_back: composed.period.fell_back,
            result,
        }
    }

    fn render_composed(
        &self,
        composed: &ComposedRow,
        output_dir: &Path,
    ) -> Result<GeneratedDocument, GenerationError> {
        let path = output_dir.join(composed.branch.output_file_name());
        self.renderer.render(&composed.layout, &path)?;
        if !path.is_file() {
            return Err(RenderError::OutputMissing(path).into());
        }
        Ok(GeneratedDocument {
            path,
            branch_code: composed.branch.branch_code.clone(),
            branch_name: composed
                .branch
                .branch_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_BRANCH_NAME.to_string()),
        })
    }

    /// Generates one certificate per row. Rows that fail are recorded and
    /// skipped; the report keeps input row order.
    pub fn generate_all(
        &self,
        rows: &[RawRow],
        photos: &PhotoPool,
        output_dir: &Path,
        branding: &BrandingConfig,
    ) -> BulkReport {
        self.generate_all_with_progress(rows, photos, output_dir, branding, |_| {})
    }

    /// `generate_all`, reporting progress to `on_status` as it goes.
    pub fn generate_all_with_progress(
        &self,
        rows: &[RawRow],
        photos: &PhotoPool,
        output_dir: &Path,
        branding: &BrandingConfig,
        mut on_status: impl FnMut(JobStatus),
    ) -> BulkReport {
        let total_rows = rows.len();
        on_status(JobStatus::InProgress(0));

        let mut report = BulkReport::default();
        for (i, raw) in rows.iter().enumerate() {
            let outcome = self.generate_one(i, raw, photos, output_dir, branding);
            match &outcome.result {
                Ok(doc) => info!("Row {}: wrote {}", i + 1, doc.path.display()),
                Err(e) => warn!(
                    "Row {} (branch {}) skipped: {}",
                    i + 1,
                    outcome.branch_code.as_deref().unwrap_or("?"),
                    e
                ),
            }
            report.outcomes.push(outcome);

            // Calculate progress percentage based on the number of processed rows.
            let progress = ((i + 1) as f32 / total_rows as f32 * 100.0) as u32;
            on_status(JobStatus::InProgress(progress));
        }

        let produced = report.produced_count();
        info!(
            "Generated {} of {} certificate(s), {} row(s) skipped",
            produced,
            total_rows,
            total_rows - produced
        );
        on_status(if produced > 0 {
            JobStatus::Completed(format!(
                "{} of {} certificates generated",
                produced, total_rows
            ))
        } else {
            JobStatus::Failed("No certificates were generated".to_string())
        });
        report
    }

    /// Loads rows and photos from their providers and runs `generate_all`.
    /// Only provider failures are errors; row failures are in the report.
    pub fn run(
        &self,
        rows: &(impl RowSource + ?Sized),
        photos: &(impl PhotoSource + ?Sized),
        output_dir: &Path,
        branding: &BrandingConfig,
    ) -> Result<BulkReport, EngineError> {
        let rows = rows.load_rows()?;
        let photos = photos.photo_pool()?;
        Ok(self.generate_all(&rows, &photos, output_dir, branding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::certificates::layout::{AccessoryCells, PhotoSection};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Writes the document title so tests can check what was rendered.
    #[derive(Default)]
    struct TitleRenderer {
        rendered: RefCell<Vec<CertificateLayout>>,
    }

    impl CertificateRenderer for TitleRenderer {
        fn render(&self, layout: &CertificateLayout, output: &Path) -> Result<(), RenderError> {
            fs::write(output, &layout.document_title)?;
            self.rendered.borrow_mut().push(layout.clone());
            Ok(())
        }
    }

    /// Claims success without writing anything.
    struct SilentRenderer;

    impl CertificateRenderer for SilentRenderer {
        fn render(&self, _: &CertificateLayout, _: &Path) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn row(code: &str, name: &str) -> RawRow {
        RawRow::new()
            .with("branch_code", code)
            .with("branch_name", name)
            .with("complete_board_size", "8x4")
    }

    #[test]
    fn progress_ends_with_completion() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let rows = vec![row("1", "A"), row("x", "B")];
        let mut statuses = Vec::new();
        engine.generate_all_with_progress(
            &rows,
            &PhotoPool::new(),
            out.path(),
            &BrandingConfig::default(),
            |s| statuses.push(s),
        );
        assert_eq!(
            statuses,
            vec![
                JobStatus::InProgress(0),
                JobStatus::InProgress(50),
                JobStatus::InProgress(100),
                JobStatus::Completed("1 of 2 certificates generated".into()),
            ]
        );
    }

    #[test]
    fn empty_input_reports_failure() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let mut last = None;
        let report = engine.generate_all_with_progress(
            &[],
            &PhotoPool::new(),
            out.path(),
            &BrandingConfig::default(),
            |s| last = Some(s),
        );
        assert!(report.is_empty());
        assert_eq!(
            last,
            Some(JobStatus::Failed("No certificates were generated".into()))
        );
    }

    #[test]
    fn missing_output_is_a_render_failure() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(SilentRenderer, today());
        let outcome = engine.generate_one(
            0,
            &row("101", "Jaipur"),
            &PhotoPool::new(),
            out.path(),
            &BrandingConfig::default(),
        );
        assert!(matches!(
            outcome.result,
            Err(GenerationError::Render(RenderError::OutputMissing(_)))
        ));
        assert_eq!(outcome.branch_code.as_deref(), Some("101"));
    }

    #[test]
    fn date_fallback_is_flagged_but_still_generates() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let raw = row("101", "Jaipur").with("installation_date", "next week");
        let outcome = engine.generate_one(
            0,
            &raw,
            &PhotoPool::new(),
            out.path(),
            &BrandingConfig::default(),
        );
        assert!(outcome.date_fell_back);
        assert!(outcome.is_success());
    }

    #[test]
    fn composed_rows_carry_the_accessory_policy() {
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let raw = row("101.0", "Jaipur")
            .with("led_module_qty", "24")
            .with("power_supply_watt", "150");
        let composed = engine
            .compose_row(0, &raw, &PhotoPool::new(), &BrandingConfig::default())
            .unwrap();
        assert_eq!(composed.branch.branch_code, "101");
        assert_eq!(
            composed.layout.spec_rows[0].accessory,
            AccessoryCells::Merged(layout::COMPREHENSIVE_LABEL)
        );
        assert_eq!(composed.layout.photos, PhotoSection::Placeholder);
    }

    #[test]
    fn colliding_names_overwrite_and_both_rows_report_the_path() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let rows = vec![row("7", "Ajmer"), row("7.0", "Ajmer")];
        let report = engine.generate_all(&rows, &PhotoPool::new(), out.path(), &BrandingConfig::default());
        let paths = report.produced_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], paths[1]);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
        assert_eq!(engine.renderer().rendered.borrow().len(), 2);
    }

    #[test]
    fn run_reads_from_providers() {
        let out = TempDir::new().unwrap();
        let engine = CertificateEngine::with_today(TitleRenderer::default(), today());
        let rows = vec![row("101", "Jaipur"), row("102", "Udaipur")];
        let photos: PhotoPool = ["in/101_1.jpg"].into_iter().collect();
        let report = engine
            .run(&rows, &photos, out.path(), &BrandingConfig::default())
            .unwrap();
        assert_eq!(report.produced_count(), 2);
        let rendered = engine.renderer().rendered.borrow();
        assert!(matches!(rendered[0].photos, PhotoSection::Photos(_)));
        assert_eq!(rendered[1].photos, PhotoSection::Placeholder);
    }
}
