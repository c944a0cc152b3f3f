//! Grid layers
//!
//! A layer is a named, z-ordered, independently visible sparse grid of cells.
//! Layers carry no reference to the document that owns them; the document
//! addresses them by index and emits change events on their behalf.

use std::collections::HashMap;

use super::cell::{Cell, CellKey};
use super::property::{
    expect_bool, expect_float, expect_text, float_changed, Properties, PropertyDescriptor,
    PropertyKind, PropertyValue,
};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Layer {
    id: String,
    z: f32,
    visible: bool,
    cells: HashMap<CellKey, Cell>,
}

impl Layer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            z: 0.0,
            visible: true,
            cells: HashMap::new(),
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true if the id changed
    pub fn set_id(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.id == id {
            return false;
        }
        self.id = id;
        true
    }

    /// Returns true if z changed
    pub fn set_z(&mut self, z: f32) -> bool {
        if !float_changed(self.z, z) {
            return false;
        }
        self.z = z;
        true
    }

    /// Returns true if visibility changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cells.get(&CellKey::new(x, y))
    }

    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.cells.get_mut(&CellKey::new(x, y))
    }

    /// Place a cell, returning whatever was there before
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> Option<Cell> {
        self.cells.insert(CellKey::new(x, y), cell)
    }

    pub fn clear_cell(&mut self, x: i32, y: i32) -> Option<Cell> {
        self.cells.remove(&CellKey::new(x, y))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over `(x, y, cell)` in unspecified order
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &Cell)> {
        self.cells.iter().map(|(key, cell)| (key.x(), key.y(), cell))
    }

    /// Cells ordered by row, then column
    pub fn sorted_cells(&self) -> Vec<(i32, i32, Cell)> {
        let mut cells: Vec<_> = self.cells().map(|(x, y, c)| (x, y, *c)).collect();
        cells.sort_by_key(|&(x, y, _)| (y, x));
        cells
    }

    /// Equality including the cells
    pub fn same_content(&self, other: &Layer) -> bool {
        self == other && self.cells == other.cells
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)` over occupied cells
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        self.cells().fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((min_x, min_y, max_x, max_y)) => {
                Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
            }
        })
    }
}

/// Structural equality on id, z and visibility. Cells are not compared.
/// A NaN z equals a NaN z.
impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && !float_changed(self.z, other.z) && self.visible == other.visible
    }
}

/// True if two layer lists differ in length, any layer field, or any cell
pub(crate) fn layers_differ(old: &[Layer], new: &[Layer]) -> bool {
    old.len() != new.len() || old.iter().zip(new).any(|(a, b)| !a.same_content(b))
}

fn get_id(layer: &Layer) -> PropertyValue {
    PropertyValue::Text(layer.id.clone())
}

fn set_id(layer: &mut Layer, value: PropertyValue) -> Result<()> {
    layer.set_id(expect_text("id", PropertyKind::Text, value)?);
    Ok(())
}

fn get_z(layer: &Layer) -> PropertyValue {
    PropertyValue::Float(layer.z)
}

fn set_z(layer: &mut Layer, value: PropertyValue) -> Result<()> {
    layer.set_z(expect_float("z", &value)?);
    Ok(())
}

fn get_visible(layer: &Layer) -> PropertyValue {
    PropertyValue::Bool(layer.visible)
}

fn set_visible(layer: &mut Layer, value: PropertyValue) -> Result<()> {
    layer.set_visible(expect_bool("visible", &value)?);
    Ok(())
}

static LAYER_PROPERTIES: [PropertyDescriptor<Layer>; 3] = [
    PropertyDescriptor {
        name: "id",
        kind: PropertyKind::Text,
        get: get_id,
        set: set_id,
    },
    PropertyDescriptor {
        name: "z",
        kind: PropertyKind::Float,
        get: get_z,
        set: set_z,
    },
    PropertyDescriptor {
        name: "visible",
        kind: PropertyKind::Bool,
        get: get_visible,
        set: set_visible,
    },
];

impl Properties for Layer {
    const ENTITY: &'static str = "layer";

    fn properties() -> &'static [PropertyDescriptor<Self>] {
        &LAYER_PROPERTIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_report_changes() {
        let mut layer = Layer::new("bg");
        assert!(!layer.set_id("bg"));
        assert!(layer.set_id("fg"));
        assert_eq!(layer.id(), "fg");

        assert!(!layer.set_z(0.0));
        assert!(layer.set_z(2.5));
        assert_eq!(layer.z(), 2.5);

        assert!(!layer.set_visible(true));
        assert!(layer.set_visible(false));
        assert!(!layer.is_visible());
    }

    #[test]
    fn test_equality_ignores_cells() {
        let mut a = Layer::new("bg").with_z(1.0);
        let b = Layer::new("bg").with_z(1.0);
        a.set_cell(0, 0, Cell::new(7));
        assert_eq!(a, b);

        let c = Layer::new("bg").with_z(1.0).with_visible(false);
        assert_ne!(a, c);
    }

    #[test]
    fn test_nan_z_equals_itself() {
        let a = Layer::new("n").with_z(f32::NAN);
        assert_eq!(a, a.clone());
        assert!(a.same_content(&a.clone()));
        assert!(!layers_differ(&[a.clone()], &[a.clone()]));
        assert_ne!(a, Layer::new("n"));
    }

    #[test]
    fn test_cells() {
        let mut layer = Layer::new("bg");
        assert_eq!(layer.set_cell(-2, 3, Cell::new(1)), None);
        assert_eq!(layer.set_cell(-2, 3, Cell::new(2)), Some(Cell::new(1)));
        layer.set_cell(4, -1, Cell::new(5).flipped(true, false));

        assert_eq!(layer.cell_count(), 2);
        assert_eq!(layer.cell(-2, 3), Some(&Cell::new(2)));
        assert_eq!(layer.bounds(), Some((-2, -1, 4, 3)));

        let sorted = layer.sorted_cells();
        assert_eq!(sorted[0].0, 4);
        assert_eq!(sorted[1].0, -2);

        assert_eq!(layer.clear_cell(-2, 3), Some(Cell::new(2)));
        assert_eq!(layer.cell(-2, 3), None);
    }

    #[test]
    fn test_layer_descriptors() {
        let mut layer = Layer::new("bg");
        let z = Layer::descriptor("z").unwrap();
        (z.set)(&mut layer, PropertyValue::Int(3)).unwrap();
        assert_eq!(layer.z(), 3.0);

        let id = Layer::descriptor("id").unwrap();
        assert!((id.set)(&mut layer, PropertyValue::Float(1.0)).is_err());
        assert_eq!(Layer::properties().len(), 3);
    }
}
