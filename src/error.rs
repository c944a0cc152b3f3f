//! Error types
//!
//! Only hard failures live here. Advisory problems (bad cell size, duplicate
//! layer ids, unresolved tile sets) are recorded as statuses on the document
//! and never surface as a `GridError`.

use thiserror::Error;

use crate::grid::property::PropertyKind;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("layer index {index} out of range ({len} layers)")]
    LayerOutOfRange { index: usize, len: usize },

    #[error("no cell at ({x}, {y}) in layer {layer}")]
    NoCell { layer: usize, x: i32, y: i32 },

    #[error("unknown property '{name}' on {entity}")]
    UnknownProperty { entity: &'static str, name: String },

    #[error("property '{name}' expects a {expected} value")]
    TypeMismatch {
        name: &'static str,
        expected: PropertyKind,
    },

    #[error("{owner}: resource '{field}' is not specified")]
    EmptyResource { owner: String, field: String },

    #[error("{owner}: resource '{path}' referenced by '{field}' not found")]
    MissingResource {
        owner: String,
        field: String,
        path: String,
    },
}

/// Convenience type alias for Results with GridError
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GridError = io_err.into();
        assert!(matches!(err, GridError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = GridError::LayerOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "layer index 3 out of range (2 layers)");

        let err = GridError::TypeMismatch {
            name: "z",
            expected: PropertyKind::Float,
        };
        assert_eq!(err.to_string(), "property 'z' expects a float value");

        let err = GridError::MissingResource {
            owner: "level.tilegrid".to_string(),
            field: "tile_set".to_string(),
            path: "/missing.tileset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "level.tilegrid: resource '/missing.tileset' referenced by 'tile_set' not found"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = ron::from_str::<u32>("not a number").unwrap_err();
        let err: GridError = parse_err.into();
        assert!(matches!(err, GridError::Parse(_)));
    }
}
