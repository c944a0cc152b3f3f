//! Grid loading and saving
//!
//! The serialized form of a grid is [`TileGridMessage`]. Source grids are
//! stored as plain RON so they can be edited by hand; compiled grids are
//! brotli-compressed. Readers accept either.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::format;
use crate::storage::ResourceResolver;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of layers in a grid
    pub const MAX_LAYERS: usize = 256;
    /// Maximum number of cells in a single layer
    pub const MAX_CELLS_PER_LAYER: usize = 1 << 20;
    /// Maximum string length for ids and paths
    pub const MAX_STRING_LEN: usize = 1024;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileCellMessage {
    pub x: i32,
    pub y: i32,
    pub tile: i32,
    #[serde(default)]
    pub h_flip: u32,
    #[serde(default)]
    pub v_flip: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileLayerMessage {
    pub id: String,
    #[serde(default)]
    pub z: f32,
    /// Non-zero means visible
    #[serde(default = "default_visible")]
    pub is_visible: u32,
    #[serde(default)]
    pub cells: Vec<TileCellMessage>,
}

fn default_visible() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileGridMessage {
    /// Tile set path, content-root relative
    #[serde(default)]
    pub tile_set: String,
    pub cell_width: f32,
    pub cell_height: f32,
    #[serde(default)]
    pub layers: Vec<TileLayerMessage>,
}

fn check_string(value: &str, context: &str) -> std::result::Result<(), String> {
    if value.len() > limits::MAX_STRING_LEN {
        return Err(format!(
            "{}: string too long ({} > {})",
            context,
            value.len(),
            limits::MAX_STRING_LEN
        ));
    }
    Ok(())
}

/// Reject files that exceed the resource limits.
///
/// Advisory conditions (bad cell size, duplicate ids) are not checked here;
/// those load fine and show up as document status.
pub fn validate_grid_message(msg: &TileGridMessage) -> Result<()> {
    check_string(&msg.tile_set, "tile_set").map_err(GridError::Validation)?;

    if msg.layers.len() > limits::MAX_LAYERS {
        return Err(GridError::Validation(format!(
            "too many layers ({} > {})",
            msg.layers.len(),
            limits::MAX_LAYERS
        )));
    }

    for (i, layer) in msg.layers.iter().enumerate() {
        let context = format!("layer[{}]", i);
        check_string(&layer.id, &context).map_err(GridError::Validation)?;
        if layer.cells.len() > limits::MAX_CELLS_PER_LAYER {
            return Err(GridError::Validation(format!(
                "{}: too many cells ({} > {})",
                context,
                layer.cells.len(),
                limits::MAX_CELLS_PER_LAYER
            )));
        }
    }

    Ok(())
}

/// Parse grid data from bytes (plain or compressed RON)
pub fn parse_grid_data(bytes: &[u8], origin: &str) -> Result<TileGridMessage> {
    let contents = format::decode_text(bytes)?;
    let msg: TileGridMessage = format::parse_ron(&contents, origin)?;
    validate_grid_message(&msg)?;
    Ok(msg)
}

/// Load a grid from a file on disk
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<TileGridMessage> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    parse_grid_data(&bytes, &path.display().to_string())
}

/// Load a grid through a storage backend
pub fn load_grid_with_storage(path: &str, storage: &dyn ResourceResolver) -> Result<TileGridMessage> {
    let bytes = storage.read(path)?;
    parse_grid_data(&bytes, path)
}

/// Plain RON text of a grid
pub fn grid_to_ron(msg: &TileGridMessage) -> Result<String> {
    format::to_ron_string(msg)
}

/// Compressed bytes of a grid
pub fn serialize_grid(msg: &TileGridMessage) -> Result<Vec<u8>> {
    format::to_compressed(msg)
}

/// Save a grid as plain RON
pub fn save_grid<P: AsRef<Path>>(msg: &TileGridMessage, path: P) -> Result<()> {
    fs::write(path, grid_to_ron(msg)?)?;
    Ok(())
}
