//! # Photo Pool
//!
//! Site photos are matched to branch rows purely by file name:
//! `{branch_code}_{type_id}.jpg` for a specific coverage variant, or a bare
//! `{branch_code}.jpg` used for every variant of that branch.
//!
//! - `keys`: the normalizer shared by branch codes and photo file names.
//! - `verify`: pre-flight report of which expected photos are present.
//! - `staging`: copies/extracts uploaded photos into a temporary directory
//!   and builds the pool from it.
//!
//! Resolution and pre-flight validation use the same lookup order, so an item
//! reported `Ready` always resolves during generation.

pub mod keys;
pub mod staging;
pub mod verify;

use crate::error::EngineError;
use common::model::variant::VariantKind;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Normalized photo key -> readable image file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoPool {
    by_key: BTreeMap<String, PathBuf>,
}

impl PhotoPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file under the key derived from its name. A later file with
    /// the same key replaces the earlier one.
    pub fn insert_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let key = keys::normalize(&path.to_string_lossy());
        self.insert(key, path);
    }

    /// Registers a path under an explicit, already-normalized key.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        let path = path.into();
        if let Some(previous) = self.by_key.insert(key.clone(), path) {
            debug!("Photo key '{}' replaced {}", key, previous.display());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.by_key.get(key).map(PathBuf::as_path)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Available keys, for pre-flight validation.
    pub fn keys(&self) -> BTreeSet<String> {
        self.by_key.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Photo for `branch`'s `kind` variant: the specific `{branch}_{type_id}`
    /// key first, then the bare `{branch}` key. `None` is not an error; the
    /// certificate is rendered without that photo.
    pub fn resolve(&self, branch: &str, kind: VariantKind) -> Option<&Path> {
        self.get(&keys::expected_key(branch, kind))
            .or_else(|| self.get(branch))
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PhotoPool {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut pool = PhotoPool::new();
        for path in iter {
            pool.insert_file(path);
        }
        pool
    }
}

/// Supplies the photo pool of one generation request.
pub trait PhotoSource {
    fn photo_pool(&self) -> Result<PhotoPool, EngineError>;
}

impl PhotoSource for PhotoPool {
    fn photo_pool(&self) -> Result<PhotoPool, EngineError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_key_wins_over_bare_key() {
        let pool: PhotoPool = ["in/101_2.jpg", "in/101.png"].into_iter().collect();
        assert_eq!(
            pool.resolve("101", VariantKind::FasciaOnly),
            Some(Path::new("in/101_2.jpg"))
        );
    }

    #[test]
    fn bare_key_is_the_fallback() {
        let pool: PhotoPool = ["in/101.png"].into_iter().collect();
        assert_eq!(
            pool.resolve("101", VariantKind::CompleteBoard),
            Some(Path::new("in/101.png"))
        );
        assert_eq!(
            pool.resolve("101", VariantKind::FasciaPlusLed),
            Some(Path::new("in/101.png"))
        );
    }

    #[test]
    fn absent_photo_resolves_to_none() {
        let pool: PhotoPool = ["in/102_1.jpg"].into_iter().collect();
        assert_eq!(pool.resolve("101", VariantKind::CompleteBoard), None);
    }

    #[test]
    fn later_files_replace_earlier_keys() {
        let pool: PhotoPool = ["a/101_1.jpg", "b/101_1.png"].into_iter().collect();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get("101_1"), Some(Path::new("b/101_1.png")));
    }
}
