//! Editable property tables
//!
//! Every editable entity publishes a static table of [`PropertyDescriptor`]s.
//! A property sheet walks the table to list fields, read values and write
//! edits back; the command layer uses the same tables to build invertible
//! property edits.

use std::fmt;

use crate::error::{GridError, Result};

/// Value type of a property, used by editors to pick a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    Text,
    /// Text holding a content-root relative resource path
    Resource,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Bool => "bool",
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Text => "text",
            PropertyKind::Resource => "resource",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats accept integer values too, the way a numeric text field would
    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}

/// Getter/setter pair for one field of `T`
pub struct PropertyDescriptor<T: 'static> {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub get: fn(&T) -> PropertyValue,
    /// Stores the value. Fails only on a kind mismatch.
    pub set: fn(&mut T, PropertyValue) -> Result<()>,
}

impl<T> fmt::Debug for PropertyDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Entities that publish a property table
pub trait Properties: Sized + 'static {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    fn properties() -> &'static [PropertyDescriptor<Self>];

    fn descriptor(name: &str) -> Result<&'static PropertyDescriptor<Self>> {
        Self::properties()
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| GridError::UnknownProperty {
                entity: Self::ENTITY,
                name: name.to_string(),
            })
    }
}

// Value extraction helpers shared by the descriptor tables

pub(crate) fn expect_bool(name: &'static str, value: &PropertyValue) -> Result<bool> {
    value.as_bool().ok_or(GridError::TypeMismatch {
        name,
        expected: PropertyKind::Bool,
    })
}

pub(crate) fn expect_int(name: &'static str, value: &PropertyValue) -> Result<i32> {
    value.as_int().ok_or(GridError::TypeMismatch {
        name,
        expected: PropertyKind::Int,
    })
}

pub(crate) fn expect_float(name: &'static str, value: &PropertyValue) -> Result<f32> {
    value.as_float().ok_or(GridError::TypeMismatch {
        name,
        expected: PropertyKind::Float,
    })
}

pub(crate) fn expect_text(
    name: &'static str,
    kind: PropertyKind,
    value: PropertyValue,
) -> Result<String> {
    match value {
        PropertyValue::Text(v) => Ok(v),
        _ => Err(GridError::TypeMismatch {
            name,
            expected: kind,
        }),
    }
}

/// Change test for floats that treats NaN as equal to NaN
pub(crate) fn float_changed(old: f32, new: f32) -> bool {
    old != new && !(old.is_nan() && new.is_nan())
}

/// Change test for property values, using [`float_changed`] for floats
pub(crate) fn values_differ(old: &PropertyValue, new: &PropertyValue) -> bool {
    match (old, new) {
        (PropertyValue::Float(a), PropertyValue::Float(b)) => float_changed(*a, *b),
        _ => old != new,
    }
}
