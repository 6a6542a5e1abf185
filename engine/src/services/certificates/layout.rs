//! Font-independent plan of one certificate.
//!
//! `compose` turns a parsed row into a `CertificateLayout` holding every
//! string, cell and photo the renderer will place. All business rules
//! (accessory display policy, photo fallback, placeholder, terms splitting)
//! are decided here, so they can be checked without producing a PDF.

use crate::services::certificates::branch::BranchRow;
use crate::services::certificates::dates::WarrantyPeriod;
use crate::services::certificates::markup;
use crate::services::photos::PhotoPool;
use common::model::branding::BrandingConfig;
use common::model::variant::{AccessoryPolicy, Variant, VariantKind};
use std::path::PathBuf;

pub const CERTIFICATE_TITLE: &str = "WARRANTY CERTIFICATE";
pub const COMPREHENSIVE_LABEL: &str = "Comprehensive Warranty";
pub const NO_PHOTO_PLACEHOLDER: &str = "[No Photo Available]";
pub const NOT_AVAILABLE: &str = "N/A";
pub const SPEC_HEADINGS: [&str; 5] = [
    "Warranty Coverage",
    "Board Size",
    "Total Sqft",
    "LED Module (Qty)",
    "Power Supply",
];
pub const FOOTER_LINES: [&str; 2] = [
    "This is a computer-generated warranty certificate. No signature required.",
    "This document contains confidential terms and proprietary information",
];

/// What is repeated at the top of every page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    /// Only set when the configured logo file exists.
    pub logo: Option<PathBuf>,
    pub company_name: String,
}

/// One row of the branch-info block.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoCells {
    Pair(String, String),
    /// A single cell spanning both columns.
    Span(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoLine {
    pub cells: InfoCells,
    /// Drawn in the highlight color (the warranty dates).
    pub highlighted: bool,
}

/// LED module / power supply columns of a specification row.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessoryCells {
    /// Both columns merged into one cell carrying the label.
    Merged(&'static str),
    Blank,
    Values {
        led_modules: String,
        power_supply: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecRow {
    pub kind: VariantKind,
    pub title: String,
    pub size: String,
    pub sqft: String,
    pub accessory: AccessoryCells,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoBlock {
    pub caption: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSection {
    /// The row has no variants; nothing is drawn.
    Omitted,
    /// At least one variant resolved a photo.
    Photos(Vec<PhotoBlock>),
    /// Variants exist but none resolved a photo.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub document_title: String,
    pub header: PageHeader,
    pub client_name: String,
    pub branch_info: Vec<InfoLine>,
    /// Empty when no variant was detected; the table still gets its heading row.
    pub spec_rows: Vec<SpecRow>,
    pub photos: PhotoSection,
    /// Terms paragraphs, inline markup preserved.
    pub terms: Vec<String>,
}

/// Builds the certificate plan for one branch.
pub fn compose(
    branch: &BranchRow,
    variants: &[Variant],
    period: &WarrantyPeriod,
    photos: &PhotoPool,
    branding: &BrandingConfig,
) -> CertificateLayout {
    CertificateLayout {
        document_title: format!("Warranty Certificate {}", branch.branch_code),
        header: PageHeader {
            logo: branding.logo_path.clone().filter(|p| p.is_file()),
            company_name: branding.company_name.clone(),
        },
        client_name: branding.client_name.clone(),
        branch_info: branch_info(branch, period),
        spec_rows: variants.iter().map(|v| spec_row(v, branch)).collect(),
        photos: photo_section(&branch.branch_code, variants, photos),
        terms: markup::split_lines(&branding.terms_text),
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn branch_info(branch: &BranchRow, period: &WarrantyPeriod) -> Vec<InfoLine> {
    let line = |cells, highlighted| InfoLine { cells, highlighted };
    vec![
        line(
            InfoCells::Pair(
                format!("Branch Code: {} | IFSC: {}", branch.branch_code, or_na(&branch.ifsc_code)),
                format!("Branch Name: {}", or_na(&branch.branch_name)),
            ),
            false,
        ),
        line(
            InfoCells::Pair(
                format!("City: {}", or_na(&branch.city_name)),
                format!(
                    "District: {} | State: {}",
                    or_na(&branch.district),
                    or_na(&branch.state)
                ),
            ),
            false,
        ),
        line(
            InfoCells::Span(format!("Address: {}", or_na(&branch.address))),
            false,
        ),
        line(
            InfoCells::Pair(
                format!("Installation Date: {}", period.installed_display()),
                format!("Warranty Valid Until: {}", period.expires_display()),
            ),
            true,
        ),
    ]
}

/// LED/power cells for a variant. Decided by the kind alone; the row's
/// accessory values are only read for `RowValues`.
pub fn accessory_cells(kind: VariantKind, branch: &BranchRow) -> AccessoryCells {
    match kind.accessory_policy() {
        AccessoryPolicy::Comprehensive => AccessoryCells::Merged(COMPREHENSIVE_LABEL),
        AccessoryPolicy::Blank => AccessoryCells::Blank,
        AccessoryPolicy::RowValues => AccessoryCells::Values {
            led_modules: branch.led_module_qty.clone().unwrap_or_else(|| "0".to_string()),
            power_supply: branch.power_supply_watt.clone().unwrap_or_else(|| "0".to_string()),
        },
    }
}

fn spec_row(variant: &Variant, branch: &BranchRow) -> SpecRow {
    SpecRow {
        kind: variant.kind,
        title: variant.title().to_string(),
        size: variant.size.clone(),
        sqft: variant.sqft.clone(),
        accessory: accessory_cells(variant.kind, branch),
    }
}

fn photo_section(branch_code: &str, variants: &[Variant], photos: &PhotoPool) -> PhotoSection {
    if variants.is_empty() {
        return PhotoSection::Omitted;
    }
    let blocks: Vec<PhotoBlock> = variants
        .iter()
        .filter_map(|v| {
            photos.resolve(branch_code, v.kind).map(|path| PhotoBlock {
                caption: v.photo_caption(),
                path: path.to_path_buf(),
            })
        })
        .collect();
    if blocks.is_empty() {
        PhotoSection::Placeholder
    } else {
        PhotoSection::Photos(blocks)
    }
}
