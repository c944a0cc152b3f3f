//! Tile set resources
//!
//! A tile set names the source image that tiles are cut from and the tile
//! geometry within it. Grids reference tile sets by path; the grid document
//! loads the referenced tile set to decide whether the reference is usable.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format;
use crate::storage::ResourceResolver;

/// Serialized tile set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileSetMessage {
    /// Source image, content-root relative
    pub image: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Pixels around the border of the image that hold no tiles
    #[serde(default)]
    pub tile_margin: u32,
    /// Pixels between neighbouring tiles
    #[serde(default)]
    pub tile_spacing: u32,
    /// Optional collision image, content-root relative
    #[serde(default)]
    pub collision: String,
}

impl TileSetMessage {
    pub fn new(image: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            image: image.into(),
            tile_width,
            tile_height,
            ..Default::default()
        }
    }

    /// Everything that makes this tile set unusable, empty when it is fine
    pub fn problems(&self, storage: &dyn ResourceResolver) -> Vec<String> {
        let mut problems = Vec::new();

        if self.image.is_empty() {
            problems.push("no image specified".to_string());
        } else if !storage.exists(&self.image) {
            problems.push(format!("image '{}' not found", self.image));
        }
        if self.tile_width == 0 {
            problems.push("tile width must be greater than zero".to_string());
        }
        if self.tile_height == 0 {
            problems.push("tile height must be greater than zero".to_string());
        }
        if !self.collision.is_empty() && !storage.exists(&self.collision) {
            problems.push(format!("collision image '{}' not found", self.collision));
        }

        problems
    }

    pub fn is_valid(&self, storage: &dyn ResourceResolver) -> bool {
        self.problems(storage).is_empty()
    }

    /// Number of whole tiles that fit in an image of the given size
    pub fn tile_count(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        fn fit(extent: u32, margin: u32, tile: u32, spacing: u32) -> u32 {
            if tile == 0 {
                return 0;
            }
            let usable = extent.saturating_sub(2 * margin);
            if usable < tile {
                return 0;
            }
            1 + (usable - tile) / (tile + spacing)
        }
        (
            fit(image_width, self.tile_margin, self.tile_width, self.tile_spacing),
            fit(image_height, self.tile_margin, self.tile_height, self.tile_spacing),
        )
    }
}

/// Parse tile set data from bytes (plain or compressed RON)
pub fn parse_tile_set_data(bytes: &[u8], origin: &str) -> Result<TileSetMessage> {
    let contents = format::decode_text(bytes)?;
    format::parse_ron(&contents, origin)
}

/// Read and parse a tile set through storage
pub fn load_tile_set(storage: &dyn ResourceResolver, path: &str) -> Result<TileSetMessage> {
    let bytes = storage.read(path)?;
    parse_tile_set_data(&bytes, path)
}
