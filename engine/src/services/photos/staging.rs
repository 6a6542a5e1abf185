use crate::error::EngineError;
use crate::services::photos::{PhotoPool, PhotoSource};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn has_extension(name: &str, accepted: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| accepted.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

fn is_image(name: &str) -> bool {
    has_extension(name, &IMAGE_EXTENSIONS)
}

fn is_zip(name: &str) -> bool {
    has_extension(name, &["zip"])
}

/// Photos of one request, copied into a private temporary directory.
///
/// Loose image files are copied; image entries of zip archives are extracted
/// by base name, ignoring the archive's directory structure. The directory and
/// everything in it is removed when this value is dropped.
#[derive(Debug)]
pub struct StagedPhotos {
    dir: TempDir,
    pool: PhotoPool,
}

impl StagedPhotos {
    /// Stages `inputs` in order; a later input replaces an earlier photo with
    /// the same key. Inputs that are neither images nor zip archives are
    /// skipped.
    pub fn stage<P: AsRef<Path>>(inputs: &[P]) -> Result<Self, EngineError> {
        let dir = tempfile::Builder::new().prefix("warranty-photos-").tempdir()?;
        let mut pool = PhotoPool::new();

        for input in inputs {
            let input = input.as_ref();
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if is_zip(&name) {
                extract_images(input, dir.path(), &mut pool)?;
            } else if is_image(&name) {
                let dest = dir.path().join(&name);
                fs::copy(input, &dest)?;
                pool.insert_file(dest);
            } else {
                warn!("Skipping {}: not a photo or zip archive", input.display());
            }
        }

        info!("Staged {} photo(s) in {}", pool.len(), dir.path().display());
        Ok(Self { dir, pool })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn pool(&self) -> &PhotoPool {
        &self.pool
    }
}

impl PhotoSource for StagedPhotos {
    fn photo_pool(&self) -> Result<PhotoPool, EngineError> {
        Ok(self.pool.clone())
    }
}

/// Extracts the image entries of one archive into `dest`.
fn extract_images(archive_path: &Path, dest: &Path, pool: &mut PhotoPool) -> Result<(), EngineError> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let mut extracted = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().replace('\\', "/");
        let base = name.rsplit('/').next().unwrap_or_default().to_string();
        // Resource forks such as `._101_1.jpg` carry an image extension but no image.
        if base.starts_with('.') || !is_image(&base) {
            debug!("Ignoring zip entry {}", name);
            continue;
        }
        let out_path: PathBuf = dest.join(&base);
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        pool.insert_file(out_path);
        extracted += 1;
    }

    debug!("Extracted {} photo(s) from {}", extracted, archive_path.display());
    Ok(())
}
