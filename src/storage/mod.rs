//! Storage Abstraction Layer
//!
//! The document model never touches the filesystem directly. Resources it
//! references (tile sets, images) are read through a [`ResourceResolver`]:
//! - [`LocalStorage`] → files under a content root directory
//! - [`MemoryStorage`] → embedded content and tests
//!
//! All operations are synchronous and complete immediately.

pub mod local;
pub mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File or directory not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::IoError(e.to_string()),
        }
    }
}

/// Resolves content-root relative paths to resource contents.
///
/// Paths are written the way grid files reference them, e.g.
/// `/tilesets/forest.tileset`. A leading `/` means "content root" and is
/// ignored by every backend.
pub trait ResourceResolver {
    /// Read the full contents of a resource
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check if a resource exists without reading it.
    ///
    /// Called for every image a tile set references, so backends answer
    /// this from metadata rather than through `read`.
    fn exists(&self, path: &str) -> bool;

    /// Read a resource as a UTF-8 string
    fn read_string(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| StorageError::Other(e.to_string()))
    }
}

/// Strip the content-root marker from a resource path
pub(crate) fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}
