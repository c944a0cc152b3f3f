//! Build pipeline helpers
//!
//! Compiling a grid means checking that everything it references exists on
//! disk and writing the compressed runtime form next to the source.

use std::path::PathBuf;

use crate::error::{GridError, Result};
use crate::grid::{load_grid_with_storage, serialize_grid};
use crate::storage::LocalStorage;

/// Extension of grid source files
pub const GRID_EXT: &str = ".tilegrid";
/// Extension of compiled grids
pub const COMPILED_GRID_EXT: &str = ".tilegridc";

pub fn replace_ext(path: &str, from: &str, to: &str) -> String {
    match path.strip_suffix(from) {
        Some(stem) => format!("{}{}", stem, to),
        None => path.to_string(),
    }
}

/// Check that `path`, referenced by `field` of `owner`, names an existing file
pub fn check_file(storage: &LocalStorage, owner: &str, field: &str, path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(GridError::EmptyResource {
            owner: owner.to_string(),
            field: field.to_string(),
        });
    }
    let file = storage.resolve(path);
    if !file.exists() {
        return Err(GridError::MissingResource {
            owner: owner.to_string(),
            field: field.to_string(),
            path: path.to_string(),
        });
    }
    Ok(file)
}

/// Compile a grid source into its runtime form, returning the output path.
///
/// Only `.tilegrid` sources are accepted; the output never replaces the source.
pub fn build_grid(storage: &LocalStorage, source: &str) -> Result<String> {
    if !source.ends_with(GRID_EXT) {
        return Err(GridError::Validation(format!(
            "{}: grid sources must use the {} extension",
            source, GRID_EXT
        )));
    }
    let msg = load_grid_with_storage(source, storage)?;
    check_file(storage, source, "tile_set", &msg.tile_set)?;

    let output = replace_ext(source, GRID_EXT, COMPILED_GRID_EXT);
    storage.write(&output, &serialize_grid(&msg)?)?;
    Ok(output)
}
