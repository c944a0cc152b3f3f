//! Grid cells and their coordinate keys

use super::property::{expect_bool, expect_int, Properties, PropertyDescriptor, PropertyKind, PropertyValue};
use crate::error::Result;

/// A single grid position's tile reference plus flip flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub tile: i32,
    pub h_flip: bool,
    pub v_flip: bool,
}

impl Cell {
    pub fn new(tile: i32) -> Self {
        Self {
            tile,
            h_flip: false,
            v_flip: false,
        }
    }

    pub fn flipped(mut self, h_flip: bool, v_flip: bool) -> Self {
        self.h_flip = h_flip;
        self.v_flip = v_flip;
        self
    }
}

/// Packed cell coordinate: upper 32 bits y, lower 32 bits x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    pub fn new(x: i32, y: i32) -> Self {
        CellKey(((y as u32 as u64) << 32) | (x as u32 as u64))
    }

    pub fn x(self) -> i32 {
        self.0 as u32 as i32
    }

    pub fn y(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub fn coords(self) -> (i32, i32) {
        (self.x(), self.y())
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

fn get_tile(cell: &Cell) -> PropertyValue {
    PropertyValue::Int(cell.tile)
}

fn set_tile(cell: &mut Cell, value: PropertyValue) -> Result<()> {
    cell.tile = expect_int("tile", &value)?;
    Ok(())
}

fn get_h_flip(cell: &Cell) -> PropertyValue {
    PropertyValue::Bool(cell.h_flip)
}

fn set_h_flip(cell: &mut Cell, value: PropertyValue) -> Result<()> {
    cell.h_flip = expect_bool("h_flip", &value)?;
    Ok(())
}

fn get_v_flip(cell: &Cell) -> PropertyValue {
    PropertyValue::Bool(cell.v_flip)
}

fn set_v_flip(cell: &mut Cell, value: PropertyValue) -> Result<()> {
    cell.v_flip = expect_bool("v_flip", &value)?;
    Ok(())
}

static CELL_PROPERTIES: [PropertyDescriptor<Cell>; 3] = [
    PropertyDescriptor {
        name: "tile",
        kind: PropertyKind::Int,
        get: get_tile,
        set: set_tile,
    },
    PropertyDescriptor {
        name: "h_flip",
        kind: PropertyKind::Bool,
        get: get_h_flip,
        set: set_h_flip,
    },
    PropertyDescriptor {
        name: "v_flip",
        kind: PropertyKind::Bool,
        get: get_v_flip,
        set: set_v_flip,
    },
];

impl Properties for Cell {
    const ENTITY: &'static str = "cell";

    fn properties() -> &'static [PropertyDescriptor<Self>] {
        &CELL_PROPERTIES
    }
}
