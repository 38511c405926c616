use crate::document::Doc;
use quire_common::{DocResult, Position};
use serde::Serialize;
use std::cmp::Ordering;

/// Directional selection: `anchor` stays put while `focus` follows the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cursor {
    pub anchor: Position,
    pub focus: Position,
}

impl Cursor {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Collapsed cursor at `position`
    pub fn at(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Normalized `(from, to)` pair in document order
    pub fn range(&self, doc: &Doc) -> DocResult<(Position, Position)> {
        match doc.compare(self.anchor, self.focus)? {
            Ordering::Greater => Ok((self.focus, self.anchor)),
            Ordering::Less | Ordering::Equal => Ok((self.anchor, self.focus)),
        }
    }

    /// Fail unless both ends address `doc`
    pub fn validate(&self, doc: &Doc) -> DocResult<()> {
        doc.validate_position(self.anchor)?;
        doc.validate_position(self.focus)
    }
}
