//! tilegrid: editable tile-grid documents for game content editors
//!
//! - [`grid`]: the document model (layers, cells, status, events, commands)
//! - [`tileset`]: tile set resources referenced by grids
//! - [`storage`]: how referenced resources are read
//! - [`pipeline`]: build-time checks and compilation
//! - [`prefs`]: editor view preferences

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod format;
pub mod grid;
pub mod pipeline;
pub mod prefs;
pub mod storage;
pub mod tileset;

pub use error::{GridError, Result};
pub use grid::{Cell, CommandHistory, GridCommand, GridDocument, GridEvent, Layer};
pub use storage::{LocalStorage, MemoryStorage, ResourceResolver};
