//! # Editor State
//!
//! A document snapshot paired with a cursor. Every operator maps one
//! `EditorState` to the next; history keeps old states around as opaque
//! values.

use crate::cursor::Cursor;
use crate::document::Doc;
use crate::mutations;
use quire_common::{DocResult, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Doc,
    pub cursor: Cursor,
}

impl EditorState {
    pub fn new(doc: Doc, cursor: Cursor) -> Self {
        Self { doc, cursor }
    }

    /// Empty document with the cursor at the start of the root
    pub fn empty() -> Self {
        let doc = Doc::new();
        let root = doc.root();
        Self::collapsed(doc, Position::new(root, 0))
    }

    pub fn collapsed(doc: Doc, position: Position) -> Self {
        Self::new(doc, Cursor::at(position))
    }

    pub fn with_cursor(&self, cursor: Cursor) -> DocResult<Self> {
        cursor.validate(&self.doc)?;
        Ok(Self::new(self.doc.clone(), cursor))
    }

    pub fn insert_text(&self, text: &str) -> DocResult<Self> {
        mutations::insert_text(self, text)
    }

    pub fn insert_paragraph(&self) -> DocResult<Self> {
        mutations::insert_paragraph(self)
    }

    pub fn delete_content_backward(&self) -> DocResult<Self> {
        mutations::delete_content_backward(self)
    }

    pub fn delete_content_forward(&self) -> DocResult<Self> {
        mutations::delete_content_forward(self)
    }

    pub fn delete_selected_range(&self) -> DocResult<Self> {
        mutations::delete_selected_range(self)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::empty()
    }
}
