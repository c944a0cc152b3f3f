//! In-memory storage backend
//!
//! Holds resources in a map keyed by normalized path. Used for embedded
//! content and for exercising the document model without a filesystem.

use std::collections::HashMap;

use super::{normalize, ResourceResolver, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path).to_string(), data.into());
    }

    /// Builder-style variant of [`MemoryStorage::insert`]
    pub fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(normalize(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceResolver for MemoryStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(normalize(path))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(normalize(path))
    }
}
