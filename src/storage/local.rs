//! Local filesystem storage backend
//!
//! Resolves resource paths against a content root directory.

use super::{normalize, ResourceResolver, StorageError};
use std::path::PathBuf;

/// Local filesystem storage backend
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Content root that resource paths are relative to
    base_dir: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    /// Create a new local storage backend rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    /// Create a local storage backend with a custom content root
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Resolve a resource path to its location on disk
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(normalize(path))
    }

    /// Write a file
    ///
    /// Creates or overwrites the file with the given data.
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);

        // Ensure parent directory exists
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&full_path, data)?;
        Ok(())
    }
}

impl ResourceResolver for LocalStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
