//! # Undo/Redo Stack
//!
//! Tracks editor history as whole [`EditorState`] snapshots.
//!
//! ## Design
//!
//! - Snapshots are cheap: documents share unchanged node payloads
//! - Record the state *before* an edit; undo hands it back and parks the
//!   current state on the redo stack
//! - New records clear the redo stack
//! - Batches group several edits (e.g. a burst of typing) into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let before = state.clone();
//! let state = state.insert_text("Hello")?;
//! stack.record(before);
//!
//! let state = stack.undo(state).unwrap();
//! ```

use crate::state::EditorState;

/// One undo step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// State to restore
    pub state: EditorState,

    /// Optional description of this step
    pub description: Option<String>,
}

impl HistoryEntry {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for editor states
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of states to undo to (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Stack of undone states (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch; `Some(None)` until its first record arrives
    current_batch: Option<Option<HistoryEntry>>,

    /// Description applied to the open batch
    batch_description: Option<String>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            batch_description: None,
        }
    }

    /// Record the state an edit started from
    pub fn record(&mut self, before: EditorState) {
        self.record_entry(HistoryEntry::new(before));
    }

    /// Record the state an edit started from, with a description
    pub fn record_described(&mut self, before: EditorState, description: impl Into<String>) {
        self.record_entry(HistoryEntry::new(before).with_description(description));
    }

    fn record_entry(&mut self, entry: HistoryEntry) {
        match self.current_batch {
            // Only the first state of a batch matters
            Some(Some(_)) => {}
            Some(None) => self.current_batch = Some(Some(entry)),
            None => self.push_entry(entry),
        }
        self.redo_stack.clear();
    }

    /// Start a batch of edits (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.end_batch();
        self.current_batch = Some(None);
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(Some(mut entry)) = self.current_batch.take() {
            if let Some(description) = self.batch_description.take() {
                entry.description = Some(description);
            }
            self.push_entry(entry);
        }
        self.batch_description = None;
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if self.current_batch.is_some() {
            self.batch_description = Some(description.into());
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. Returns the state to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: EditorState) -> Option<EditorState> {
        self.end_batch();
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(HistoryEntry {
            state: current,
            description: entry.description.clone(),
        });
        Some(entry.state)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: EditorState) -> Option<EditorState> {
        self.end_batch();
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(HistoryEntry {
            state: current,
            description: entry.description.clone(),
        });
        Some(entry.state)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || matches!(self.current_batch, Some(Some(_)))
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
        self.batch_description = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &EditorState, text: &str) -> EditorState {
        state.insert_text(text).unwrap()
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut stack = UndoStack::new();
        let empty = EditorState::empty();

        let hello = typed(&empty, "Hello");
        stack.record(empty.clone());
        assert!(stack.can_undo());

        let restored = stack.undo(hello.clone()).unwrap();
        assert_eq!(restored.doc.text_content(), "");
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 1);

        let redone = stack.redo(restored).unwrap();
        assert_eq!(redone.doc.text_content(), "Hello");
        assert_eq!(redone.cursor, hello.cursor);
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_batched_edits() {
        let mut stack = UndoStack::new();
        let empty = EditorState::empty();

        stack.begin_batch();
        stack.set_batch_description("Type greeting");

        let first = typed(&empty, "Hel");
        stack.record(empty.clone());
        let second = typed(&first, "lo");
        stack.record(first);

        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Type greeting"));

        let restored = stack.undo(second).unwrap();
        assert_eq!(restored.doc.text_content(), "");
        assert_eq!(stack.redo_description(), Some("Type greeting"));
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut stack = UndoStack::new();
        let empty = EditorState::empty();
        let hello = typed(&empty, "Hello");

        stack.record(empty.clone());
        let restored = stack.undo(hello).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        stack.record(restored);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        let mut state = EditorState::empty();

        for i in 0..3 {
            let next = typed(&state, &i.to_string());
            stack.record(state);
            state = next;
        }

        // Should only keep 2 (max levels)
        assert_eq!(stack.undo_levels(), 2);
        let restored = stack.undo(state).unwrap();
        assert_eq!(restored.doc.text_content(), "01");
    }

    #[test]
    fn test_undo_on_empty_stack() {
        let mut stack = UndoStack::new();
        assert!(stack.undo(EditorState::empty()).is_none());
        assert!(stack.redo(EditorState::empty()).is_none());
    }
}
