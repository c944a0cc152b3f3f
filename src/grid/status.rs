//! Advisory property status
//!
//! Validation never rejects an edit. Instead each field carries a set of
//! raised statuses that a property sheet can display next to it. Raising a
//! status is always paired with a clearing call once the condition goes away.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    TileSetNotSpecified,
    TileSetNotFound,
    InvalidTileSet,
    InvalidCellWidth,
    InvalidCellHeight,
    DuplicatedLayerIds,
}

impl StatusCode {
    pub fn severity(self) -> Severity {
        match self {
            StatusCode::TileSetNotSpecified => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// User-facing message. `arg` is the offending path, when there is one.
    pub fn message(self, arg: Option<&str>) -> String {
        let arg = arg.unwrap_or("");
        match self {
            StatusCode::TileSetNotSpecified => "No tile set specified".to_string(),
            StatusCode::TileSetNotFound => format!("Tile set '{}' could not be found", arg),
            StatusCode::InvalidTileSet => format!("Tile set '{}' is invalid", arg),
            StatusCode::InvalidCellWidth => "Cell width must be greater than zero".to_string(),
            StatusCode::InvalidCellHeight => "Cell height must be greater than zero".to_string(),
            StatusCode::DuplicatedLayerIds => "Layer ids must be unique".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub code: StatusCode,
    pub severity: Severity,
    pub message: String,
}

impl Status {
    pub fn new(code: StatusCode, arg: Option<&str>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: code.message(arg),
        }
    }

    /// Info statuses do not make a field invalid
    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Info
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.message)
    }
}

/// Raised statuses per field name
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    fields: BTreeMap<&'static str, Vec<Status>>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `code` on `field`, replacing an earlier status with the same code
    pub fn set(&mut self, field: &'static str, code: StatusCode, arg: Option<&str>) {
        let statuses = self.fields.entry(field).or_default();
        statuses.retain(|s| s.code != code);
        statuses.push(Status::new(code, arg));
    }

    pub fn clear(&mut self, field: &'static str, code: StatusCode) {
        if let Some(statuses) = self.fields.get_mut(field) {
            statuses.retain(|s| s.code != code);
            if statuses.is_empty() {
                self.fields.remove(field);
            }
        }
    }

    /// Raise or clear `code` depending on `raised`
    pub fn update(&mut self, field: &'static str, code: StatusCode, raised: bool) {
        if raised {
            self.set(field, code, None);
        } else {
            self.clear(field, code);
        }
    }

    pub fn get(&self, field: &str) -> &[Status] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str, code: StatusCode) -> bool {
        self.get(field).iter().any(|s| s.code == code)
    }

    /// Most severe status on a field
    pub fn worst(&self, field: &str) -> Option<&Status> {
        self.get(field).iter().max_by_key(|s| s.severity)
    }

    /// True when the field has no warning or error
    pub fn is_ok(&self, field: &str) -> bool {
        self.get(field).iter().all(Status::is_ok)
    }

    /// True when no field has a warning or error
    pub fn all_ok(&self) -> bool {
        self.fields.values().flatten().all(Status::is_ok)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Status)> {
        self.fields
            .iter()
            .flat_map(|(field, statuses)| statuses.iter().map(move |s| (*field, s)))
    }
}
