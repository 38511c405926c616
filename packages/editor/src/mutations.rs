//! # Editing Operators
//!
//! User-facing edits expressed over the document's address space.
//!
//! ## Operator Semantics
//!
//! ### insertText
//! - Replaces a non-collapsed selection first
//! - Lands in the text node around the focus when there is one; otherwise a
//!   new text node is created (plus a paragraph when the focus is at the root)
//!
//! ### insertParagraph
//! - Splits the paragraph around the focus; the caret moves to the start of
//!   the part after it
//!
//! ### deleteContentBackward / deleteContentForward
//! - Removes one character inside a text node
//! - At a node boundary, joins with the neighbouring sibling, climbing to the
//!   parent when there is none
//! - A no-op at the edges of the document
//!
//! ### deleteSelectedRange
//! - Cuts the range out of its deepest common ancestor and merges the two
//!   remnants back together, as if the user had typed through the span
//!
//! Every operator is a pure function from one [`EditorState`] to the next.

use crate::document::Doc;
use crate::node::{byte_index, char_len, Node};
use crate::split::{merge, split};
use crate::state::EditorState;
use quire_common::{DocError, DocResult, NodeId, Position};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Edits the binding layer can request, named after the input types it receives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditCommand {
    /// Type `text` at the cursor
    InsertText { text: String },

    /// Break the current paragraph
    InsertParagraph,

    /// Backspace
    DeleteContentBackward,

    /// Delete key
    DeleteContentForward,

    /// Remove the selection
    DeleteSelectedRange,
}

impl EditCommand {
    pub fn apply(&self, state: &EditorState) -> DocResult<EditorState> {
        match self {
            EditCommand::InsertText { text } => insert_text(state, text),
            EditCommand::InsertParagraph => insert_paragraph(state),
            EditCommand::DeleteContentBackward => delete_content_backward(state),
            EditCommand::DeleteContentForward => delete_content_forward(state),
            EditCommand::DeleteSelectedRange => delete_selected_range(state),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::InsertText { .. } => "insertText",
            EditCommand::InsertParagraph => "insertParagraph",
            EditCommand::DeleteContentBackward => "deleteContentBackward",
            EditCommand::DeleteContentForward => "deleteContentForward",
            EditCommand::DeleteSelectedRange => "deleteSelectedRange",
        }
    }
}

/// Insert `text` at the cursor
pub fn insert_text(state: &EditorState, text: &str) -> DocResult<EditorState> {
    let state = collapse_selection(state)?;
    if text.is_empty() {
        return Ok(state);
    }

    let doc = &state.doc;
    let focus = state.cursor.focus;
    doc.validate_position(focus)?;
    let inserted = char_len(text);
    let node = doc.get(focus.node_id)?;

    if node.is_text() {
        let doc = splice_text(doc, focus.node_id, focus.offset, 0, text)?;
        return Ok(EditorState::collapsed(
            doc,
            Position::new(focus.node_id, focus.offset + inserted),
        ));
    }

    let siblings = doc.child_ids(focus.node_id);
    if let Some(&after) = siblings.get(focus.offset) {
        if doc.get(after)?.is_text() {
            let doc = splice_text(doc, after, 0, 0, text)?;
            return Ok(EditorState::collapsed(doc, Position::new(after, inserted)));
        }
    }
    if let Some(&before) = focus.offset.checked_sub(1).and_then(|i| siblings.get(i)) {
        if doc.get(before)?.is_text() {
            let length = doc.length(before)?;
            let doc = splice_text(doc, before, length, 0, text)?;
            return Ok(EditorState::collapsed(
                doc,
                Position::new(before, length + inserted),
            ));
        }
    }

    let text_node = Node::text(text);
    let text_id = text_node.id;
    let doc = if node.is_root() {
        let paragraph = Node::paragraph();
        let paragraph_id = paragraph.id;
        doc.insert(focus, paragraph)?
            .insert_last(paragraph_id, text_node)?
    } else {
        doc.insert(focus, text_node)?
    };
    Ok(EditorState::collapsed(doc, Position::new(text_id, inserted)))
}

/// Break the paragraph at the cursor
pub fn insert_paragraph(state: &EditorState) -> DocResult<EditorState> {
    let state = collapse_selection(state)?;
    let doc = &state.doc;
    let focus = state.cursor.focus;
    doc.validate_position(focus)?;

    let Some(block) = doc.find_ancestor(focus.node_id, Node::is_block)? else {
        return insert_paragraph_at_root(doc, focus);
    };

    let result = split(doc, block, focus)?;
    match (result.left, result.right) {
        (Some(_), Some(right)) => Ok(EditorState::collapsed(result.doc, Position::new(right, 0))),
        (None, Some(right)) => {
            let doc = result.doc.insert_before(right, Node::paragraph())?;
            Ok(EditorState::collapsed(doc, Position::new(right, 0)))
        }
        // At the end the whole block is the left half
        (_, None) => {
            let paragraph = Node::paragraph();
            let paragraph_id = paragraph.id;
            let doc = result.doc.insert_after(block, paragraph)?;
            Ok(EditorState::collapsed(doc, Position::new(paragraph_id, 0)))
        }
    }
}

fn insert_paragraph_at_root(doc: &Doc, focus: Position) -> DocResult<EditorState> {
    let root = doc.root();
    if doc.child_count(root) == 0 {
        let second = Node::paragraph();
        let second_id = second.id;
        let doc = doc
            .insert_last(root, Node::paragraph())?
            .insert_last(root, second)?;
        return Ok(EditorState::collapsed(doc, Position::new(second_id, 0)));
    }

    // Inline content hanging directly off the root: break after it
    let at = if focus.node_id == root {
        focus
    } else {
        let top = doc.child_toward(root, focus.node_id)?;
        Position::new(root, doc.offset(top)? + 1)
    };
    let paragraph = Node::paragraph();
    let paragraph_id = paragraph.id;
    let doc = doc.insert(at, paragraph)?;
    Ok(EditorState::collapsed(doc, Position::new(paragraph_id, 0)))
}

/// Backspace: remove one unit before the cursor
pub fn delete_content_backward(state: &EditorState) -> DocResult<EditorState> {
    if !state.cursor.is_collapsed() {
        return delete_selected_range(state);
    }
    match delete_backward_at(&state.doc, state.cursor.focus)? {
        Some((doc, position)) => Ok(EditorState::collapsed(doc, position)),
        None => {
            tracing::debug!(focus = %state.cursor.focus, "backward delete at document start");
            Ok(state.clone())
        }
    }
}

/// Delete key: remove one unit after the cursor
pub fn delete_content_forward(state: &EditorState) -> DocResult<EditorState> {
    if !state.cursor.is_collapsed() {
        return delete_selected_range(state);
    }
    match delete_forward_at(&state.doc, state.cursor.focus)? {
        Some((doc, position)) => Ok(EditorState::collapsed(doc, position)),
        None => {
            tracing::debug!(focus = %state.cursor.focus, "forward delete at document end");
            Ok(state.clone())
        }
    }
}

/// Remove the selection and collapse the cursor where it started
pub fn delete_selected_range(state: &EditorState) -> DocResult<EditorState> {
    let (from, to) = state.cursor.range(&state.doc)?;
    let (doc, position) = delete_and_merge(&state.doc, from, to)?;
    Ok(EditorState::collapsed(doc, position))
}

/// Delete everything between `from` and `to` and join what is left on either side.
///
/// Returns the new document and the collapsed cursor position.
pub fn delete_and_merge(doc: &Doc, from: Position, to: Position) -> DocResult<(Doc, Position)> {
    let (from, to) = match doc.compare(from, to)? {
        Ordering::Equal => return Ok((doc.clone(), from)),
        Ordering::Less => (from, to),
        Ordering::Greater => (to, from),
    };

    if from.node_id == to.node_id {
        if doc.get(from.node_id)?.is_text() {
            return remove_text(doc, from.node_id, from.offset, to.offset);
        }
        let doc = doc.splice(from.node_id, from.offset, to.offset - from.offset, Vec::new())?;
        return Ok((doc, from));
    }

    let ancestor = doc.common_ancestor(from.node_id, to.node_id)?;
    if doc.get(ancestor)?.is_text() {
        return Err(DocError::unsupported_range(format!(
            "range {} .. {} crosses into a text node",
            from, to
        )));
    }

    // Cut at `to` first: splitting there never disturbs ids or offsets before it
    let (doc, to_index) = cut(doc, ancestor, to)?;
    let right = doc.child_ids(ancestor).get(to_index).copied();
    let (doc, from_index) = cut(&doc, ancestor, from)?;
    let to_index = match right {
        Some(right) => doc.offset(right)?,
        None => doc.child_count(ancestor),
    };
    let left = from_index
        .checked_sub(1)
        .map(|index| doc.child_ids(ancestor)[index]);

    tracing::debug!(
        ancestor = %ancestor,
        removed = to_index - from_index,
        "delete range"
    );
    let doc = doc.splice(ancestor, from_index, to_index - from_index, Vec::new())?;

    if let (Some(left), Some(_)) = (left, right) {
        let merged = merge(&doc, left)?;
        return Ok((merged.doc, merged.position));
    }

    // Nothing left before the cut: continue at the head of the right remnant
    let position = match (left, right) {
        (None, Some(right)) => doc.start_point(right)?,
        _ if doc.contains(from.node_id) => from,
        _ => Position::new(ancestor, from_index),
    };
    Ok((doc, position))
}

/// Split the child of `ancestor` holding `at` so that a child boundary falls
/// exactly on `at`. Returns the index of that boundary.
fn cut(doc: &Doc, ancestor: NodeId, at: Position) -> DocResult<(Doc, usize)> {
    if at.node_id == ancestor {
        return Ok((doc.clone(), at.offset));
    }
    let child = doc.child_toward(ancestor, at.node_id)?;
    let result = split(doc, child, at)?;
    let index = match result.right {
        Some(right) => result.doc.offset(right)?,
        None => result.doc.offset(child)? + 1,
    };
    Ok((result.doc, index))
}

fn collapse_selection(state: &EditorState) -> DocResult<EditorState> {
    if state.cursor.is_collapsed() {
        Ok(state.clone())
    } else {
        delete_selected_range(state)
    }
}

fn delete_backward_at(doc: &Doc, focus: Position) -> DocResult<Option<(Doc, Position)>> {
    doc.validate_position(focus)?;
    if focus.offset == 0 {
        return join_backward(doc, focus.node_id);
    }
    if doc.get(focus.node_id)?.is_text() {
        return remove_text(doc, focus.node_id, focus.offset - 1, focus.offset).map(Some);
    }

    let child = doc.child_ids(focus.node_id)[focus.offset - 1];
    let end = doc.end_point(child)?;
    if end.offset == 0 {
        // Empty leaf: the unit before the cursor is the node itself
        let position = doc.position_of(end.node_id)?;
        return Ok(Some((doc.delete(end.node_id)?, position)));
    }
    delete_backward_at(doc, end)
}

fn delete_forward_at(doc: &Doc, focus: Position) -> DocResult<Option<(Doc, Position)>> {
    doc.validate_position(focus)?;
    if focus.offset == doc.length(focus.node_id)? {
        return join_forward(doc, focus.node_id);
    }
    if doc.get(focus.node_id)?.is_text() {
        return remove_text(doc, focus.node_id, focus.offset, focus.offset + 1).map(Some);
    }

    let child = doc.child_ids(focus.node_id)[focus.offset];
    let start = doc.start_point(child)?;
    if doc.length(start.node_id)? == 0 {
        let position = doc.position_of(start.node_id)?;
        return Ok(Some((doc.delete(start.node_id)?, position)));
    }
    delete_forward_at(doc, start)
}

/// Join `id` (or its closest ancestor that has one) with the previous sibling
fn join_backward(doc: &Doc, id: NodeId) -> DocResult<Option<(Doc, Position)>> {
    let mut current = id;
    while current != doc.root() {
        if let Some(previous) = doc.previous_sibling(current)? {
            if doc.get(previous)?.can_merge_with(doc.get(current)?) {
                let merged = merge(doc, previous)?;
                return Ok(Some((merged.doc, merged.position)));
            }
            // Different variants: eat into the previous sibling instead
            return delete_backward_at(doc, doc.position_of(current)?);
        }
        current = doc.parent(current)?;
    }
    Ok(None)
}

/// Join `id` (or its closest ancestor that has one) with the next sibling
fn join_forward(doc: &Doc, id: NodeId) -> DocResult<Option<(Doc, Position)>> {
    let mut current = id;
    while current != doc.root() {
        if let Some(next) = doc.next_sibling(current)? {
            if doc.get(current)?.can_merge_with(doc.get(next)?) {
                let merged = merge(doc, current)?;
                return Ok(Some((merged.doc, merged.position)));
            }
            return delete_forward_at(doc, doc.position_of(next)?);
        }
        current = doc.parent(current)?;
    }
    Ok(None)
}

/// Replace `delete` characters at `offset` of text node `id` with `insert`
fn splice_text(doc: &Doc, id: NodeId, offset: usize, delete: usize, insert: &str) -> DocResult<Doc> {
    let node = doc.get(id)?;
    let text = node
        .text_content()
        .ok_or_else(|| DocError::invalid_operation(format!("node {} is not text", id)))?;

    let length = char_len(text);
    if offset + delete > length {
        return Err(DocError::InvalidOffset {
            node_id: id,
            offset: offset + delete,
            length,
        });
    }

    let start = byte_index(text, offset);
    let end = byte_index(text, offset + delete);
    let mut next = String::with_capacity(text.len() - (end - start) + insert.len());
    next.push_str(&text[..start]);
    next.push_str(insert);
    next.push_str(&text[end..]);
    doc.replace(id, Arc::new(node.with_text(next)))
}

/// Remove characters `from..to` of text node `id`. A node left empty is
/// deleted and the cursor lands where it used to be.
fn remove_text(doc: &Doc, id: NodeId, from: usize, to: usize) -> DocResult<(Doc, Position)> {
    let length = doc.length(id)?;
    if from > to || to > length {
        return Err(DocError::InvalidOffset {
            node_id: id,
            offset: to,
            length,
        });
    }
    if from == 0 && to == length {
        let position = doc.position_of(id)?;
        return Ok((doc.delete(id)?, position));
    }
    Ok((splice_text(doc, id, from, to - from, "")?, Position::new(id, from)))
}
