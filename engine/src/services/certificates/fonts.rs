use crate::config::EngineConfig;
use crate::error::RenderError;
use genpdf::fonts::{FontData, FontFamily};
use log::debug;
use std::path::{Path, PathBuf};

const REGULAR_SUFFIXES: [&str; 2] = ["-Regular", ""];
const BOLD_SUFFIXES: [&str; 1] = ["-Bold"];
const ITALIC_SUFFIXES: [&str; 2] = ["-Italic", "-Oblique"];
const BOLD_ITALIC_SUFFIXES: [&str; 2] = ["-BoldItalic", "-BoldOblique"];

/// The four face files of one font family.
///
/// Families ship under two naming schemes: `Arial-Regular.ttf` /
/// `Arial-Italic.ttf` and `DejaVuSans.ttf` / `DejaVuSans-Oblique.ttf`. Both are
/// accepted. A missing bold or italic face is filled with the closest face
/// that exists, so a regular file alone is enough to render.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyFiles {
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub italic: PathBuf,
    pub bold_italic: PathBuf,
}

impl FamilyFiles {
    /// Locates `family` in `dir`; `None` when it has no regular face there.
    pub fn find(dir: &Path, family: &str) -> Option<Self> {
        let regular = face(dir, family, &REGULAR_SUFFIXES)?;
        let bold = face(dir, family, &BOLD_SUFFIXES).unwrap_or_else(|| regular.clone());
        let italic = face(dir, family, &ITALIC_SUFFIXES).unwrap_or_else(|| regular.clone());
        let bold_italic = face(dir, family, &BOLD_ITALIC_SUFFIXES).unwrap_or_else(|| bold.clone());
        Some(Self {
            regular,
            bold,
            italic,
            bold_italic,
        })
    }

    pub fn load(&self) -> Result<FontFamily<FontData>, genpdf::error::Error> {
        Ok(FontFamily {
            regular: FontData::load(&self.regular, None)?,
            bold: FontData::load(&self.bold, None)?,
            italic: FontData::load(&self.italic, None)?,
            bold_italic: FontData::load(&self.bold_italic, None)?,
        })
    }
}

fn face(dir: &Path, family: &str, suffixes: &[&str]) -> Option<PathBuf> {
    suffixes
        .iter()
        .map(|suffix| dir.join(format!("{}{}.ttf", family, suffix)))
        .find(|path| path.is_file())
}

/// Tries each configured family in each font directory, in order.
pub fn load_font(config: &EngineConfig) -> Result<FontFamily<FontData>, RenderError> {
    for family in &config.font_families {
        for dir in &config.font_dirs {
            let Some(files) = FamilyFiles::find(dir, family) else {
                continue;
            };
            match files.load() {
                Ok(fonts) => {
                    debug!(
                        "Using font family {} from {}",
                        family,
                        files.regular.display()
                    );
                    return Ok(fonts);
                }
                Err(e) => debug!("Font family {} not usable in {}: {}", family, dir.display(), e),
            }
        }
    }
    Err(RenderError::FontNotFound(config.font_families.join(", ")))
}
