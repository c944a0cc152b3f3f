//! Tile grid document model
//!
//! A grid references a tile set, has a cell size, and holds an ordered list
//! of layers. Each layer is a sparse map from integer coordinates to cells.

pub mod cell;
pub mod command;
pub mod document;
pub mod event;
pub mod io;
pub mod layer;
pub mod property;
pub mod status;

pub use cell::{Cell, CellKey};
pub use command::{CommandHistory, GridCommand, MAX_HISTORY};
pub use document::{fields, GridDocument};
pub use event::{EventQueue, GridEvent, PropertyOwner};
pub use io::{
    grid_to_ron, load_grid, load_grid_with_storage, parse_grid_data, save_grid, serialize_grid,
    TileCellMessage, TileGridMessage, TileLayerMessage,
};
pub use layer::Layer;
pub use property::{Properties, PropertyDescriptor, PropertyKind, PropertyValue};
pub use status::{Severity, Status, StatusCode, StatusMap};
