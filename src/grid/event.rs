//! Change notifications
//!
//! Edits push a [`GridEvent`] onto the document's [`EventQueue`]. Views drain
//! the queue once per frame instead of registering callbacks on the model.

use super::cell::Cell;
use super::property::PropertyValue;

/// Pending notifications in the order the edits happened
#[derive(Debug)]
pub struct EventQueue<T> {
    pending: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.pending.push(event);
    }

    /// Look at pending notifications, leaving them queued
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }

    /// Take every pending notification, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop pending notifications, e.g. after a bulk load
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which entity a property belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOwner {
    Document,
    /// Layer by index in the owning document
    Layer(usize),
    Cell { layer: usize, x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A scalar property on the document or a layer changed
    PropertyChanged {
        owner: PropertyOwner,
        property: &'static str,
        old: PropertyValue,
        new: PropertyValue,
    },
    /// The layer list was replaced or resized
    LayersChanged { old_count: usize, new_count: usize },
    /// A cell was placed, edited or cleared
    CellChanged {
        layer: usize,
        x: i32,
        y: i32,
        old: Option<Cell>,
        new: Option<Cell>,
    },
}

impl GridEvent {
    pub fn property(&self) -> Option<&'static str> {
        match self {
            GridEvent::PropertyChanged { property, .. } => Some(*property),
            GridEvent::LayersChanged { .. } => Some("layers"),
            GridEvent::CellChanged { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_edit_order() {
        let mut queue = EventQueue::default();
        for (old_count, new_count) in [(0, 1), (1, 2), (2, 1)] {
            queue.send(GridEvent::LayersChanged { old_count, new_count });
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().count(), 3);

        let counts: Vec<_> = queue
            .drain()
            .map(|e| match e {
                GridEvent::LayersChanged { new_count, .. } => new_count,
                _ => 0,
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert!(queue.is_empty());

        queue.send(GridEvent::LayersChanged { old_count: 1, new_count: 0 });
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_property_name() {
        let event = GridEvent::PropertyChanged {
            owner: PropertyOwner::Layer(0),
            property: "z",
            old: PropertyValue::Float(0.0),
            new: PropertyValue::Float(1.0),
        };
        assert_eq!(event.property(), Some("z"));

        let event = GridEvent::LayersChanged {
            old_count: 0,
            new_count: 2,
        };
        assert_eq!(event.property(), Some("layers"));
    }
}
