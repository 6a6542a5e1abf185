//! Bundles generated certificates into a single zip for download.

use crate::error::EngineError;
use log::info;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Writes a deflated zip at `archive_path` with one entry per file, named by
/// the file's base name. Returns the archive path.
pub fn bundle_archive<P: AsRef<Path>>(paths: &[P], archive_path: &Path) -> Result<PathBuf, EngineError> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::<()>::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| EngineError::Invalid(format!("{} has no file name", path.display())))?;
        zip.start_file(name, options)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }

    zip.finish()?;
    info!(
        "Archived {} certificate(s) into {}",
        paths.len(),
        archive_path.display()
    );
    Ok(archive_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn entries_are_named_by_base_name_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("Certificate_101_Jaipur Main.pdf");
        let b = dir.path().join("Certificate_102_Udaipur City.pdf");
        fs::write(&a, b"%PDF-a").unwrap();
        fs::write(&b, b"%PDF-b").unwrap();

        let archive_path = dir.path().join("Certificates.zip");
        let written = bundle_archive(&[&a, &b], &archive_path).unwrap();
        assert_eq!(written, archive_path);

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "Certificate_101_Jaipur Main.pdf");
        let mut body = String::new();
        first.read_to_string(&mut body).unwrap();
        assert_eq!(body, "%PDF-a");
    }

    #[test]
    fn empty_list_gives_an_empty_archive() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("empty.zip");
        bundle_archive::<PathBuf>(&[], &archive_path).unwrap();
        let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn missing_inputs_are_errors() {
        let dir = TempDir::new().unwrap();
        let result = bundle_archive(&[dir.path().join("gone.pdf")], &dir.path().join("out.zip"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
