//! The editable grid document
//!
//! Owns the layer list, validates it permissively and records every change
//! as a [`GridEvent`]. Edits never fail because a value is "invalid": a
//! zero cell width or a duplicated layer id is stored and reported through
//! [`StatusMap`] instead. Hard errors are reserved for addressing mistakes
//! (a layer index that does not exist, an unknown property name).

use std::collections::HashSet;
use std::fmt;

use super::cell::Cell;
use super::event::{EventQueue, GridEvent, PropertyOwner};
use super::io::{TileCellMessage, TileGridMessage, TileLayerMessage};
use super::layer::{layers_differ, Layer};
use super::property::{
    expect_float, expect_text, float_changed, values_differ, Properties, PropertyDescriptor,
    PropertyKind, PropertyValue,
};
use super::status::{Status, StatusCode, StatusMap};
use crate::error::{GridError, Result};
use crate::storage::ResourceResolver;
use crate::tileset::{self, TileSetMessage};

/// Field names used for status lookups and change events
pub mod fields {
    pub const TILE_SET: &str = "tile_set";
    pub const CELL_WIDTH: &str = "cell_width";
    pub const CELL_HEIGHT: &str = "cell_height";
    pub const LAYERS: &str = "layers";
}

use fields::{CELL_HEIGHT, CELL_WIDTH, LAYERS, TILE_SET};

pub struct GridDocument {
    tile_set: String,
    cell_width: f32,
    cell_height: f32,
    layers: Vec<Layer>,
    /// Parsed tile set, present when `tile_set` could be read
    tile_set_message: Option<TileSetMessage>,
    status: StatusMap,
    events: EventQueue<GridEvent>,
    storage: Box<dyn ResourceResolver>,
}

impl GridDocument {
    /// Create an empty document. Its initial statuses reflect the empty
    /// values: no tile set, zero cell size.
    pub fn new(storage: Box<dyn ResourceResolver>) -> Self {
        let mut doc = Self {
            tile_set: String::new(),
            cell_width: 0.0,
            cell_height: 0.0,
            layers: Vec::new(),
            tile_set_message: None,
            status: StatusMap::new(),
            events: EventQueue::new(),
            storage,
        };
        doc.status.set(TILE_SET, StatusCode::TileSetNotSpecified, None);
        doc.update_dimension_status();
        doc
    }

    /// Create a document filled from a message, with no pending events
    pub fn from_message(msg: &TileGridMessage, storage: Box<dyn ResourceResolver>) -> Self {
        let mut doc = Self::new(storage);
        doc.load(msg);
        doc.events.clear();
        doc
    }

    // ─────────────────────────────────────────────────────────────────────
    // Document properties
    // ─────────────────────────────────────────────────────────────────────

    pub fn tile_set(&self) -> &str {
        &self.tile_set
    }

    /// The tile set read from `tile_set`, if it could be read
    pub fn tile_set_message(&self) -> Option<&TileSetMessage> {
        self.tile_set_message.as_ref()
    }

    /// Point the grid at another tile set and try to load it.
    ///
    /// An empty path means "no tile set" and does not touch storage.
    pub fn set_tile_set(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.tile_set == path {
            return;
        }
        let old = std::mem::replace(&mut self.tile_set, path);

        if self.tile_set.is_empty() {
            self.tile_set_message = None;
            self.status.clear(TILE_SET, StatusCode::TileSetNotFound);
            self.status.clear(TILE_SET, StatusCode::InvalidTileSet);
            self.status.set(TILE_SET, StatusCode::TileSetNotSpecified, None);
        } else {
            self.status.clear(TILE_SET, StatusCode::TileSetNotSpecified);
            self.load_tile_set();
        }

        self.events.send(GridEvent::PropertyChanged {
            owner: PropertyOwner::Document,
            property: TILE_SET,
            old: PropertyValue::Text(old),
            new: PropertyValue::Text(self.tile_set.clone()),
        });
    }

    /// Read the current tile set again, e.g. after it changed on disk
    pub fn reload_tile_set(&mut self) {
        if !self.tile_set.is_empty() {
            self.load_tile_set();
        }
    }

    fn load_tile_set(&mut self) {
        self.status.clear(TILE_SET, StatusCode::TileSetNotFound);
        self.status.clear(TILE_SET, StatusCode::InvalidTileSet);
        self.tile_set_message = None;

        match tileset::load_tile_set(self.storage.as_ref(), &self.tile_set) {
            Ok(ts) => {
                let problems = ts.problems(self.storage.as_ref());
                if !problems.is_empty() {
                    eprintln!("Tile set {} is invalid: {}", self.tile_set, problems.join(", "));
                    self.status
                        .set(TILE_SET, StatusCode::InvalidTileSet, Some(self.tile_set.as_str()));
                }
                self.tile_set_message = Some(ts);
            }
            Err(GridError::Storage(e)) => {
                eprintln!("Tile set {} could not be read: {}", self.tile_set, e);
                self.status
                    .set(TILE_SET, StatusCode::TileSetNotFound, Some(self.tile_set.as_str()));
            }
            Err(e) => {
                eprintln!("Tile set {} could not be loaded: {}", self.tile_set, e);
                self.status
                    .set(TILE_SET, StatusCode::InvalidTileSet, Some(self.tile_set.as_str()));
            }
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Store any width; non-positive widths are flagged, not rejected
    pub fn set_cell_width(&mut self, width: f32) {
        let old = self.cell_width;
        self.cell_width = width;
        if float_changed(old, width) {
            self.events.send(GridEvent::PropertyChanged {
                owner: PropertyOwner::Document,
                property: CELL_WIDTH,
                old: PropertyValue::Float(old),
                new: PropertyValue::Float(width),
            });
        }
        self.update_dimension_status();
    }

    /// Store any height; non-positive heights are flagged, not rejected
    pub fn set_cell_height(&mut self, height: f32) {
        let old = self.cell_height;
        self.cell_height = height;
        if float_changed(old, height) {
            self.events.send(GridEvent::PropertyChanged {
                owner: PropertyOwner::Document,
                property: CELL_HEIGHT,
                old: PropertyValue::Float(old),
                new: PropertyValue::Float(height),
            });
        }
        self.update_dimension_status();
    }

    fn update_dimension_status(&mut self) {
        // NaN compares false and is flagged too
        self.status
            .update(CELL_WIDTH, StatusCode::InvalidCellWidth, !(self.cell_width > 0.0));
        self.status
            .update(CELL_HEIGHT, StatusCode::InvalidCellHeight, !(self.cell_height > 0.0));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layers
    // ─────────────────────────────────────────────────────────────────────

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Index of the first layer with the given id
    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    fn layer_at_mut(&mut self, index: usize) -> Result<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(GridError::LayerOutOfRange { index, len })
    }

    /// Replace the whole layer list, returning the previous one.
    ///
    /// Duplicate ids are flagged on the `layers` field. One aggregate event
    /// is sent if the list actually differs.
    pub fn set_layers(&mut self, layers: Vec<Layer>) -> Vec<Layer> {
        let changed = layers_differ(&self.layers, &layers);

        let old = std::mem::replace(&mut self.layers, layers);
        self.check_layer_ids();

        if changed {
            self.events.send(GridEvent::LayersChanged {
                old_count: old.len(),
                new_count: self.layers.len(),
            });
        }
        old
    }

    /// Append a layer, returning its index
    pub fn add_layer(&mut self, layer: Layer) -> usize {
        let old_count = self.layers.len();
        self.layers.push(layer);
        self.check_layer_ids();
        self.events.send(GridEvent::LayersChanged {
            old_count,
            new_count: self.layers.len(),
        });
        old_count
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer> {
        let old_count = self.layers.len();
        if index >= old_count {
            return Err(GridError::LayerOutOfRange {
                index,
                len: old_count,
            });
        }
        let layer = self.layers.remove(index);
        self.check_layer_ids();
        self.events.send(GridEvent::LayersChanged {
            old_count,
            new_count: self.layers.len(),
        });
        Ok(layer)
    }

    fn check_layer_ids(&mut self) {
        let mut seen = HashSet::new();
        let duplicated = self.layers.iter().any(|l| !seen.insert(l.id()));
        self.status
            .update(LAYERS, StatusCode::DuplicatedLayerIds, duplicated);
    }

    pub fn set_layer_id(&mut self, index: usize, id: impl Into<String>) -> Result<()> {
        self.set_property(PropertyOwner::Layer(index), "id", PropertyValue::Text(id.into()))
    }

    pub fn set_layer_z(&mut self, index: usize, z: f32) -> Result<()> {
        self.set_property(PropertyOwner::Layer(index), "z", PropertyValue::Float(z))
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<()> {
        self.set_property(PropertyOwner::Layer(index), "visible", PropertyValue::Bool(visible))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cells
    // ─────────────────────────────────────────────────────────────────────

    pub fn cell(&self, layer: usize, x: i32, y: i32) -> Option<&Cell> {
        self.layers.get(layer)?.cell(x, y)
    }

    /// Place (`Some`) or clear (`None`) a cell, returning the previous one
    pub fn set_cell(&mut self, layer: usize, x: i32, y: i32, cell: Option<Cell>) -> Result<Option<Cell>> {
        let target = self.layer_at_mut(layer)?;
        let old = match cell {
            Some(c) => target.set_cell(x, y, c),
            None => target.clear_cell(x, y),
        };
        if old != cell {
            self.events.send(GridEvent::CellChanged {
                layer,
                x,
                y,
                old,
                new: cell,
            });
        }
        Ok(old)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Generic property access (property sheets, commands)
    // ─────────────────────────────────────────────────────────────────────

    pub fn property(&self, owner: PropertyOwner, name: &str) -> Result<PropertyValue> {
        match owner {
            PropertyOwner::Document => Ok((Self::descriptor(name)?.get)(self)),
            PropertyOwner::Layer(index) => {
                let descriptor = Layer::descriptor(name)?;
                let layer = self.layers.get(index).ok_or(GridError::LayerOutOfRange {
                    index,
                    len: self.layers.len(),
                })?;
                Ok((descriptor.get)(layer))
            }
            PropertyOwner::Cell { layer, x, y } => {
                let descriptor = Cell::descriptor(name)?;
                let cell = self
                    .cell(layer, x, y)
                    .ok_or(GridError::NoCell { layer, x, y })?;
                Ok((descriptor.get)(cell))
            }
        }
    }

    /// Write a property through its descriptor, sending the matching event
    pub fn set_property(&mut self, owner: PropertyOwner, name: &str, value: PropertyValue) -> Result<()> {
        match owner {
            PropertyOwner::Document => (Self::descriptor(name)?.set)(self, value),
            PropertyOwner::Layer(index) => {
                let descriptor = Layer::descriptor(name)?;
                let layer = self.layer_at_mut(index)?;
                let old = (descriptor.get)(layer);
                (descriptor.set)(layer, value)?;
                let new = (descriptor.get)(layer);

                if values_differ(&old, &new) {
                    if descriptor.name == "id" {
                        self.check_layer_ids();
                    }
                    self.events.send(GridEvent::PropertyChanged {
                        owner,
                        property: descriptor.name,
                        old,
                        new,
                    });
                }
                Ok(())
            }
            PropertyOwner::Cell { layer, x, y } => {
                let descriptor = Cell::descriptor(name)?;
                let cell = self
                    .layer_at_mut(layer)?
                    .cell_mut(x, y)
                    .ok_or(GridError::NoCell { layer, x, y })?;
                let old = *cell;
                (descriptor.set)(cell, value)?;
                let new = *cell;

                if old != new {
                    self.events.send(GridEvent::CellChanged {
                        layer,
                        x,
                        y,
                        old: Some(old),
                        new: Some(new),
                    });
                }
                Ok(())
            }
        }
    }

    /// Statuses a property sheet should show next to a field.
    /// Only document fields are validated.
    pub fn property_status(&self, owner: PropertyOwner, name: &str) -> &[Status] {
        match owner {
            PropertyOwner::Document => self.status.get(name),
            _ => &[],
        }
    }

    pub fn status(&self) -> &StatusMap {
        &self.status
    }

    /// True when no field carries a warning or error
    pub fn is_valid(&self) -> bool {
        self.status.all_ok()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────

    pub fn events(&self) -> impl Iterator<Item = &GridEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        self.events.drain().collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────

    /// Fill the document from a message through the regular setters, so
    /// validation and events behave exactly as for interactive edits
    pub fn load(&mut self, msg: &TileGridMessage) {
        self.set_tile_set(msg.tile_set.clone());
        self.set_cell_width(msg.cell_width);
        self.set_cell_height(msg.cell_height);

        let layers = msg.layers.iter().map(layer_from_message).collect();
        self.set_layers(layers);
    }

    pub fn to_message(&self) -> TileGridMessage {
        TileGridMessage {
            tile_set: self.tile_set.clone(),
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            layers: self.layers.iter().map(layer_to_message).collect(),
        }
    }

    pub fn storage(&self) -> &dyn ResourceResolver {
        self.storage.as_ref()
    }
}

impl fmt::Debug for GridDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridDocument")
            .field("tile_set", &self.tile_set)
            .field("cell_width", &self.cell_width)
            .field("cell_height", &self.cell_height)
            .field("layers", &self.layers)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

fn layer_from_message(msg: &TileLayerMessage) -> Layer {
    let mut layer = Layer::new(msg.id.clone())
        .with_z(msg.z)
        .with_visible(msg.is_visible != 0);
    for c in &msg.cells {
        layer.set_cell(
            c.x,
            c.y,
            Cell {
                tile: c.tile,
                h_flip: c.h_flip != 0,
                v_flip: c.v_flip != 0,
            },
        );
    }
    layer
}

fn layer_to_message(layer: &Layer) -> TileLayerMessage {
    TileLayerMessage {
        id: layer.id().to_string(),
        z: layer.z(),
        is_visible: layer.is_visible() as u32,
        cells: layer
            .sorted_cells()
            .into_iter()
            .map(|(x, y, cell)| TileCellMessage {
                x,
                y,
                tile: cell.tile,
                h_flip: cell.h_flip as u32,
                v_flip: cell.v_flip as u32,
            })
            .collect(),
    }
}

fn get_tile_set(doc: &GridDocument) -> PropertyValue {
    PropertyValue::Text(doc.tile_set.clone())
}

fn set_tile_set(doc: &mut GridDocument, value: PropertyValue) -> Result<()> {
    doc.set_tile_set(expect_text(TILE_SET, PropertyKind::Resource, value)?);
    Ok(())
}

fn get_cell_width(doc: &GridDocument) -> PropertyValue {
    PropertyValue::Float(doc.cell_width)
}

fn set_cell_width(doc: &mut GridDocument, value: PropertyValue) -> Result<()> {
    doc.set_cell_width(expect_float(CELL_WIDTH, &value)?);
    Ok(())
}

fn get_cell_height(doc: &GridDocument) -> PropertyValue {
    PropertyValue::Float(doc.cell_height)
}

fn set_cell_height(doc: &mut GridDocument, value: PropertyValue) -> Result<()> {
    doc.set_cell_height(expect_float(CELL_HEIGHT, &value)?);
    Ok(())
}

static GRID_PROPERTIES: [PropertyDescriptor<GridDocument>; 3] = [
    PropertyDescriptor {
        name: TILE_SET,
        kind: PropertyKind::Resource,
        get: get_tile_set,
        set: set_tile_set,
    },
    PropertyDescriptor {
        name: CELL_WIDTH,
        kind: PropertyKind::Float,
        get: get_cell_width,
        set: set_cell_width,
    },
    PropertyDescriptor {
        name: CELL_HEIGHT,
        kind: PropertyKind::Float,
        get: get_cell_height,
        set: set_cell_height,
    },
];

impl Properties for GridDocument {
    const ENTITY: &'static str = "grid";

    fn properties() -> &'static [PropertyDescriptor<Self>] {
        &GRID_PROPERTIES
    }
}
