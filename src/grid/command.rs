//! Undoable edits
//!
//! Every edit is a [`GridCommand`]. Applying a command to a document returns
//! its inverse, so undo is "apply the inverse" and redo is "apply the
//! inverse of the inverse". The document itself keeps no history; a
//! [`CommandHistory`] owned by the editor sequences commands.

use super::cell::Cell;
use super::document::GridDocument;
use super::event::PropertyOwner;
use super::layer::{layers_differ, Layer};
use super::property::{values_differ, PropertyValue};
use crate::error::Result;

/// Maximum number of undo steps kept by default
pub const MAX_HISTORY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    /// Write one property through its descriptor
    SetProperty {
        owner: PropertyOwner,
        name: String,
        value: PropertyValue,
    },
    /// Replace the whole layer list
    SetLayers(Vec<Layer>),
    /// Place (`Some`) or clear (`None`) one cell
    SetCell {
        layer: usize,
        x: i32,
        y: i32,
        cell: Option<Cell>,
    },
}

impl GridCommand {
    pub fn set_property(owner: PropertyOwner, name: impl Into<String>, value: PropertyValue) -> Self {
        GridCommand::SetProperty {
            owner,
            name: name.into(),
            value,
        }
    }

    /// Short description for undo/redo menu entries
    pub fn label(&self) -> String {
        match self {
            GridCommand::SetProperty { name, .. } => format!("Set {}", name),
            GridCommand::SetLayers(_) => "Edit Layers".to_string(),
            GridCommand::SetCell { cell: Some(_), .. } => "Paint Cell".to_string(),
            GridCommand::SetCell { cell: None, .. } => "Erase Cell".to_string(),
        }
    }

    /// Perform the edit and return the command that reverts it
    pub fn apply(&self, doc: &mut GridDocument) -> Result<GridCommand> {
        self.apply_tracked(doc).map(|(inverse, _)| inverse)
    }

    /// Like [`GridCommand::apply`], also reporting whether the document changed
    fn apply_tracked(&self, doc: &mut GridDocument) -> Result<(GridCommand, bool)> {
        match self {
            GridCommand::SetProperty { owner, name, value } => {
                let old = doc.property(*owner, name)?;
                doc.set_property(*owner, name, value.clone())?;
                let changed = values_differ(&old, &doc.property(*owner, name)?);
                let inverse = GridCommand::SetProperty {
                    owner: *owner,
                    name: name.clone(),
                    value: old,
                };
                Ok((inverse, changed))
            }
            GridCommand::SetLayers(layers) => {
                let old = doc.set_layers(layers.clone());
                let changed = layers_differ(&old, layers);
                Ok((GridCommand::SetLayers(old), changed))
            }
            GridCommand::SetCell { layer, x, y, cell } => {
                let old = doc.set_cell(*layer, *x, *y, *cell)?;
                let inverse = GridCommand::SetCell {
                    layer: *layer,
                    x: *x,
                    y: *y,
                    cell: old,
                };
                Ok((inverse, old != *cell))
            }
        }
    }
}

/// Undo/redo stacks of inverse commands
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: Vec<GridCommand>,
    redo_stack: Vec<GridCommand>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Apply a command and record its inverse.
    ///
    /// Edits that change nothing are not recorded. On failure the error is
    /// logged and returned and both stacks are left as they were.
    pub fn execute(&mut self, doc: &mut GridDocument, command: GridCommand) -> Result<()> {
        let inverse = match command.apply_tracked(doc) {
            Ok((inverse, true)) => inverse,
            Ok((_, false)) => return Ok(()),
            Err(e) => {
                eprintln!("Command '{}' failed: {}", command.label(), e);
                return Err(e);
            }
        };

        self.undo_stack.push(inverse);
        self.redo_stack.clear();

        // Limit undo stack size
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        Ok(())
    }

    /// Undo the last command. Returns false when there was nothing to undo.
    pub fn undo(&mut self, doc: &mut GridDocument) -> Result<bool> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        match command.apply(doc) {
            Ok(redo) => {
                self.redo_stack.push(redo);
                Ok(true)
            }
            Err(e) => {
                eprintln!("Undo '{}' failed: {}", command.label(), e);
                self.undo_stack.push(command);
                Err(e)
            }
        }
    }

    /// Redo the last undone command. Returns false when there was nothing to redo.
    pub fn redo(&mut self, doc: &mut GridDocument) -> Result<bool> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match command.apply(doc) {
            Ok(undo) => {
                self.undo_stack.push(undo);
                Ok(true)
            }
            Err(e) => {
                eprintln!("Redo '{}' failed: {}", command.label(), e);
                self.redo_stack.push(command);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.undo_stack.last().map(GridCommand::label)
    }

    pub fn redo_label(&self) -> Option<String> {
        self.redo_stack.last().map(GridCommand::label)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history, e.g. after loading another grid
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::grid::document::fields;
    use crate::grid::status::StatusCode;
    use crate::storage::MemoryStorage;

    fn doc() -> GridDocument {
        let mut doc = GridDocument::new(Box::new(MemoryStorage::new()));
        doc.set_cell_width(16.0);
        doc.set_cell_height(16.0);
        doc.add_layer(Layer::new("bg"));
        doc.drain_events();
        doc
    }

    #[test]
    fn test_undo_redo_property() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        history
            .execute(
                &mut doc,
                GridCommand::set_property(PropertyOwner::Document, "cell_width", PropertyValue::Float(-2.0)),
            )
            .unwrap();
        assert_eq!(doc.cell_width(), -2.0);
        assert!(doc.status().has(fields::CELL_WIDTH, StatusCode::InvalidCellWidth));
        assert_eq!(history.undo_label().as_deref(), Some("Set cell_width"));

        assert!(history.undo(&mut doc).unwrap());
        assert_eq!(doc.cell_width(), 16.0);
        assert!(doc.status().is_ok(fields::CELL_WIDTH));
        assert!(history.can_redo());

        assert!(history.redo(&mut doc).unwrap());
        assert_eq!(doc.cell_width(), -2.0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_layer_property() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        history
            .execute(
                &mut doc,
                GridCommand::set_property(PropertyOwner::Layer(0), "visible", PropertyValue::Bool(false)),
            )
            .unwrap();
        assert!(!doc.layers()[0].is_visible());

        history.undo(&mut doc).unwrap();
        assert!(doc.layers()[0].is_visible());
    }

    #[test]
    fn test_undo_layers() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        history
            .execute(
                &mut doc,
                GridCommand::SetLayers(vec![Layer::new("bg"), Layer::new("bg")]),
            )
            .unwrap();
        assert!(doc.status().has(fields::LAYERS, StatusCode::DuplicatedLayerIds));

        history.undo(&mut doc).unwrap();
        assert_eq!(doc.layer_count(), 1);
        assert!(doc.status().is_ok(fields::LAYERS));
    }

    #[test]
    fn test_undo_cell() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        let paint = GridCommand::SetCell {
            layer: 0,
            x: 1,
            y: 1,
            cell: Some(Cell::new(4)),
        };
        assert_eq!(paint.label(), "Paint Cell");
        history.execute(&mut doc, paint).unwrap();
        assert_eq!(doc.cell(0, 1, 1), Some(&Cell::new(4)));
        assert_eq!(history.undo_label().as_deref(), Some("Erase Cell"));

        history.undo(&mut doc).unwrap();
        assert_eq!(doc.cell(0, 1, 1), None);

        history.redo(&mut doc).unwrap();
        assert_eq!(doc.cell(0, 1, 1), Some(&Cell::new(4)));
    }

    #[test]
    fn test_noop_property_not_recorded() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        history
            .execute(
                &mut doc,
                GridCommand::set_property(PropertyOwner::Document, "cell_height", PropertyValue::Float(16.0)),
            )
            .unwrap();
        assert!(!history.can_undo());
        assert!(doc.drain_events().is_empty());
    }

    #[test]
    fn test_int_on_float_field_unchanged_not_recorded() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        // z is already 0.0
        history
            .execute(&mut doc, GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Int(0)))
            .unwrap();
        assert_eq!(history.undo_len(), 0);

        history
            .execute(&mut doc, GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Int(3)))
            .unwrap();
        assert_eq!(history.undo_len(), 1);
        assert_eq!(doc.layers()[0].z(), 3.0);
    }

    #[test]
    fn test_nan_to_nan_not_recorded() {
        let mut doc = doc();
        let mut history = CommandHistory::new();
        let set_nan = || GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Float(f32::NAN));

        history.execute(&mut doc, set_nan()).unwrap();
        assert_eq!(history.undo_len(), 1);
        history.execute(&mut doc, set_nan()).unwrap();
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_unchanged_cell_and_layers_not_recorded() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        let erase = GridCommand::SetCell {
            layer: 0,
            x: 5,
            y: 5,
            cell: None,
        };
        history.execute(&mut doc, erase).unwrap();
        let same = doc.layers().to_vec();
        history.execute(&mut doc, GridCommand::SetLayers(same)).unwrap();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_failed_command_leaves_history() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        let result = history.execute(
            &mut doc,
            GridCommand::set_property(PropertyOwner::Layer(7), "z", PropertyValue::Float(1.0)),
        );
        assert!(matches!(result, Err(GridError::LayerOutOfRange { .. })));
        assert_eq!(history.undo_len(), 0);

        assert!(!history.undo(&mut doc).unwrap());
        assert!(!history.redo(&mut doc).unwrap());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut doc = doc();
        let mut history = CommandHistory::new();

        history
            .execute(&mut doc, GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Float(1.0)))
            .unwrap();
        history.undo(&mut doc).unwrap();
        assert_eq!(history.redo_len(), 1);

        history
            .execute(&mut doc, GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Float(2.0)))
            .unwrap();
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_history_limit() {
        let mut doc = doc();
        let mut history = CommandHistory::with_limit(3);

        for i in 1..=5 {
            history
                .execute(
                    &mut doc,
                    GridCommand::set_property(PropertyOwner::Layer(0), "z", PropertyValue::Float(i as f32)),
                )
                .unwrap();
        }
        assert_eq!(history.undo_len(), 3);

        while history.undo(&mut doc).unwrap() {}
        // Oldest two steps were dropped
        assert_eq!(doc.layers()[0].z(), 2.0);

        history.clear();
        assert!(!history.can_undo() && !history.can_redo());
    }
}
