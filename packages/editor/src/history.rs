//! # Undo/Redo History
//!
//! Linear history of committed [`Template`] snapshots with a cursor.
//!
//! ## Design
//!
//! - Every commit appends after the cursor and discards the redo tail
//! - Undo/redo only move the cursor; snapshots are never rebuilt
//! - Each committed snapshot carries a revision number
//! - The history as a whole carries a version that advances on every commit,
//!   undo and redo, so views can resync by comparing a single integer
//!
//! ## Invariants
//!
//! - `0 <= cursor < snapshots.len()`
//! - `can_undo() == (cursor > 0)`
//! - `can_redo() == (cursor < snapshots.len() - 1)`
//!
//! ## Example
//!
//! ```rust
//! use storefront_editor::{History, Template};
//!
//! let mut history = History::new(Template::new("tpl", "Shop"));
//! history.commit(Template::new("tpl", "Shop v2"), Some("Rename"));
//! assert!(history.can_undo());
//!
//! history.undo();
//! assert_eq!(history.current().template().name, "Shop");
//! ```

use crate::document::Template;
use std::sync::Arc;

/// Immutable copy of a template at a point in history
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    revision: u64,
    template: Arc<Template>,
    label: Option<String>,
}

impl Snapshot {
    fn new(revision: u64, template: Template, label: Option<String>) -> Self {
        Self {
            revision,
            template: Arc::new(template),
            label,
        }
    }

    /// Commit number that produced this snapshot (0 for the initial one)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Shared handle to the template, for renderers that outlive a borrow
    pub fn shared(&self) -> Arc<Template> {
        Arc::clone(&self.template)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Undo/redo history for a template editing session
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,

    cursor: usize,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    next_revision: u64,

    version: u64,
}

impl History {
    /// Create a history rooted at `initial` with default max levels (100)
    pub fn new(initial: Template) -> Self {
        Self::with_max_levels(initial, 100)
    }

    /// Create a history with custom max levels
    pub fn with_max_levels(initial: Template, max_levels: usize) -> Self {
        Self {
            snapshots: vec![Snapshot::new(0, initial, None)],
            cursor: 0,
            max_levels,
            next_revision: 1,
            version: 0,
        }
    }

    /// Record a new snapshot after the cursor
    ///
    /// Anything beyond the cursor (the redo tail) is discarded.
    pub fn commit(&mut self, template: Template, label: Option<&str>) -> &Snapshot {
        self.snapshots.truncate(self.cursor + 1);

        let snapshot = Snapshot::new(self.next_revision, template, label.map(str::to_string));
        self.next_revision += 1;
        self.snapshots.push(snapshot);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.snapshots.len() > self.max_levels + 1 {
            let excess = self.snapshots.len() - (self.max_levels + 1);
            self.snapshots.drain(..excess);
        }

        self.cursor = self.snapshots.len() - 1;
        self.version += 1;
        &self.snapshots[self.cursor]
    }

    /// Step back one snapshot; returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.version += 1;
        true
    }

    /// Step forward one snapshot; returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.version += 1;
        true
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Advances on every commit, undo and redo
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Drop all history, keeping the current snapshot as the new root
    pub fn clear(&mut self) {
        let current = self.snapshots.swap_remove(self.cursor);
        self.snapshots = vec![current];
        self.cursor = 0;
        self.version += 1;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        if self.can_undo() {
            self.current().label()
        } else {
            None
        }
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        if self.can_redo() {
            self.snapshots[self.cursor + 1].label()
        } else {
            None
        }
    }
}
