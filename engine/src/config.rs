//! Engine and job configuration.
//!
//! `EngineConfig` controls rendering resources (fonts, image resolution) and is
//! shared by every run. `JobManifest` describes one batch for the binary: where
//! the data and photos come from, where certificates go, and the branding.

use crate::error::EngineError;
use common::model::branding::BrandingConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FONTS_DIR_ENV: &str = "WARRANTY_FONTS_DIR";
const FONT_FAMILY_ENV: &str = "WARRANTY_FONT_FAMILY";

/// Rendering resources for the PDF renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directories searched, in order, for the font family files.
    pub font_dirs: Vec<PathBuf>,
    /// Family names tried, in order. A family is found as `{Name}-Regular.ttf`
    /// or `{Name}.ttf`; bold and italic faces (`-Bold`, `-Italic`/`-Oblique`,
    /// `-BoldItalic`/`-BoldOblique`) fall back to the regular face when absent.
    pub font_families: Vec<String>,
    /// Resolution photos and logos are resampled to before embedding.
    pub image_dpi: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            font_dirs: vec![
                PathBuf::from("./fonts"),
                PathBuf::from("/usr/share/fonts/truetype/liberation"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu"),
                PathBuf::from("/usr/share/fonts/TTF"),
                PathBuf::from("/System/Library/Fonts/Supplemental"),
                PathBuf::from("/Library/Fonts"),
            ],
            font_families: vec![
                "Arial".to_string(),
                "LiberationSans".to_string(),
                "DejaVuSans".to_string(),
            ],
            image_dpi: 150.0,
        }
    }
}

impl EngineConfig {
    /// Loads the config from an optional JSON file, then applies environment
    /// overrides. Without a file the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut config = match path {
            Some(p) => {
                debug!("Loading engine config from {}", p.display());
                serde_json::from_str(&fs::read_to_string(p)?)?
            }
            None => EngineConfig::default(),
        };
        config.apply_overrides(
            std::env::var(FONTS_DIR_ENV).ok(),
            std::env::var(FONT_FAMILY_ENV).ok(),
        );
        Ok(config)
    }

    /// Overrides are tried before the configured values.
    fn apply_overrides(&mut self, fonts_dir: Option<String>, font_family: Option<String>) {
        if let Some(dir) = fonts_dir.filter(|d| !d.trim().is_empty()) {
            self.font_dirs.insert(0, PathBuf::from(dir));
        }
        if let Some(family) = font_family.filter(|f| !f.trim().is_empty()) {
            self.font_families.insert(0, family);
        }
    }
}

/// One batch run as driven by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobManifest {
    /// Data file, one row per branch: CSV, or a workbook (`.xlsx`, `.xls`, `.ods`).
    pub data: PathBuf,
    /// Photo files and/or zip archives of photos.
    #[serde(default)]
    pub photos: Vec<PathBuf>,
    /// Directory certificates are written into. Created if missing.
    pub output_dir: PathBuf,
    /// Zip file name written inside `output_dir`. No archive when absent.
    #[serde(default)]
    pub archive: Option<String>,
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl JobManifest {
    /// Reads a manifest; relative paths are resolved against the manifest's
    /// own directory.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let mut manifest: JobManifest = serde_json::from_str(&fs::read_to_string(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.data = resolve(base, &manifest.data);
        manifest.output_dir = resolve(base, &manifest.output_dir);
        manifest.photos = manifest.photos.iter().map(|p| resolve(base, p)).collect();
        if let Some(logo) = manifest.branding.logo_path.take() {
            manifest.branding.logo_path = Some(resolve(base, &logo));
        }
        Ok(manifest)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
