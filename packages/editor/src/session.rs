//! # Edit Session Management
//!
//! An `EditSession` is what the binding layer talks to: it owns the current
//! [`EditorState`], applies [`EditCommand`]s against it and keeps the undo
//! history.
//!
//! Consecutive `insertText` commands are folded into one undo step when
//! [`EditorConfig::coalesce_typing`] is set. Any other command, a cursor move,
//! or an undo/redo closes the run.

use crate::config::EditorConfig;
use crate::cursor::Cursor;
use crate::document::Doc;
use crate::errors::EditorError;
use crate::mutations::EditCommand;
use crate::state::EditorState;
use crate::undo_stack::UndoStack;

/// Single editing session over one document
#[derive(Debug)]
pub struct EditSession {
    /// Session identifier, used in log output
    pub id: String,

    state: EditorState,
    history: UndoStack,
    config: EditorConfig,

    /// Bumped on every document change (edits, undo, redo)
    version: u64,
}

impl EditSession {
    /// Create a session with the default configuration
    pub fn new(id: impl Into<String>, state: EditorState) -> Self {
        Self::with_config(id, state, EditorConfig::default())
    }

    pub fn with_config(id: impl Into<String>, state: EditorState, config: EditorConfig) -> Self {
        Self {
            id: id.into(),
            state,
            history: UndoStack::with_max_levels(config.undo_levels),
            config,
            version: 0,
        }
    }

    /// Apply a command to the current state.
    ///
    /// On success returns the new version. A command that leaves the state as
    /// it was is not recorded and keeps the version. On failure the session is
    /// left untouched.
    pub fn apply(&mut self, command: EditCommand) -> Result<u64, EditorError> {
        let typing = self.config.coalesce_typing && matches!(command, EditCommand::InsertText { .. });
        if !typing {
            self.history.end_batch();
        }

        let next = command.apply(&self.state).map_err(|err| {
            tracing::warn!(session = %self.id, command = command.name(), error = %err, "edit rejected");
            err
        })?;

        if next == self.state {
            tracing::debug!(session = %self.id, command = command.name(), "edit changed nothing");
            return Ok(self.version);
        }

        if typing && !self.history.is_batching() {
            self.history.begin_batch();
        }
        let previous = std::mem::replace(&mut self.state, next);
        self.history.record_described(previous, command.name());
        self.version += 1;

        tracing::debug!(
            session = %self.id,
            command = command.name(),
            version = self.version,
            focus = %self.state.cursor.focus,
            "applied edit"
        );
        Ok(self.version)
    }

    /// Move the cursor without touching the document
    pub fn set_cursor(&mut self, cursor: Cursor) -> Result<(), EditorError> {
        self.state = self.state.with_cursor(cursor)?;
        self.history.end_batch();
        Ok(())
    }

    /// Restore the state before the last undo step. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.state.clone()) {
            Some(state) => {
                self.state = state;
                self.version += 1;
                tracing::debug!(session = %self.id, version = self.version, "undo");
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone step. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.state.clone()) {
            Some(state) => {
                self.state = state;
                self.version += 1;
                tracing::debug!(session = %self.id, version = self.version, "redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn doc(&self) -> &Doc {
        &self.state.doc
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }
}
