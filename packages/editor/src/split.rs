//! # Split / Merge
//!
//! The two structural primitives every editing operator is built from.
//!
//! ```text
//! split(P, (T, 2))                       merge(P)
//!
//! P[ T"abcd" ]   ──►   P[ T"ab" ] P'[ T'"cd" ]   ──►   P[ T"abcd" ]
//! ```
//!
//! - The left half of a split always keeps the id it had; only the right
//!   half is new, and it becomes the immediate next sibling.
//! - Merge joins a node with its next sibling and recurses through the
//!   last-of-left / first-of-right pair, so it undoes a deep split in one call.
//!
//! On a normalized document (no empty text nodes, no adjacent mergeable
//! siblings) `merge(split(d, n, p).left)` reproduces `d` up to the fresh ids.

use crate::document::Doc;
use crate::node::{byte_index, Node, NodeKind};
use quire_common::{DocError, DocResult, NodeId, Position};
use std::sync::Arc;

/// Outcome of [`split`]
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub doc: Doc,

    /// Part before the split point, `None` when the point is at the very start
    pub left: Option<NodeId>,

    /// Part after the split point, `None` when the point is at the very end
    pub right: Option<NodeId>,
}

/// Outcome of [`merge`]
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub doc: Doc,

    /// Deepest boundary between the joined halves
    pub position: Position,
}

/// Split `id` at `at`, which may lie anywhere inside its subtree.
pub fn split(doc: &Doc, id: NodeId, at: Position) -> DocResult<SplitResult> {
    doc.get(id)?;
    doc.validate_position(at)?;

    if at.node_id == id {
        return split_at(doc, id, at.offset);
    }
    if !doc.is_in_subtree(id, at.node_id) {
        return Err(DocError::invalid_operation(format!(
            "position {} is outside the subtree of {}",
            at, id
        )));
    }
    if id == doc.root() {
        return Err(DocError::invalid_operation("the root cannot be split"));
    }

    let child = doc.child_toward(id, at.node_id)?;
    let inner = split(doc, child, at)?;
    let boundary = match inner.right {
        Some(right) => inner.doc.offset(right)?,
        None => inner.doc.offset(child)? + 1,
    };
    split_at(&inner.doc, id, boundary)
}

/// Split `id` at one of its own offsets
fn split_at(doc: &Doc, id: NodeId, offset: usize) -> DocResult<SplitResult> {
    let length = doc.length(id)?;
    if offset > length {
        return Err(DocError::InvalidOffset {
            node_id: id,
            offset,
            length,
        });
    }
    if offset == 0 {
        return Ok(SplitResult {
            doc: doc.clone(),
            left: None,
            right: Some(id),
        });
    }
    if offset == length {
        return Ok(SplitResult {
            doc: doc.clone(),
            left: Some(id),
            right: None,
        });
    }

    let node = doc.get(id)?.clone();
    let (doc, right_id) = match &node.kind {
        NodeKind::Root => {
            return Err(DocError::invalid_operation("the root cannot be split"));
        }
        NodeKind::Text { text } => {
            let index = byte_index(text, offset);
            let right = Node::text(&text[index..]);
            let right_id = right.id;
            let doc = doc
                .replace(id, Arc::new(node.with_text(&text[..index])))?
                .insert_after(id, right)?;
            (doc, right_id)
        }
        NodeKind::Paragraph | NodeKind::Link { .. } | NodeKind::Code => {
            let right = node.fresh_copy();
            let right_id = right.id;
            let moved = doc.children(id).split_off(offset);
            let doc = doc
                .insert_after(id, right)?
                .splice(right_id, 0, 0, moved)?;
            (doc, right_id)
        }
    };

    tracing::debug!(node = %id, offset, right = %right_id, "split");
    Ok(SplitResult {
        doc,
        left: Some(id),
        right: Some(right_id),
    })
}

/// Merge `id` with its next sibling.
///
/// A no-op when there is no next sibling or the two cannot merge; the
/// returned position is then the end of `id`.
pub fn merge(doc: &Doc, id: NodeId) -> DocResult<MergeResult> {
    let node = doc.get(id)?.clone();
    let end = Position::new(id, doc.length(id)?);
    let unchanged = || MergeResult {
        doc: doc.clone(),
        position: end,
    };

    let Some(next_id) = doc.next_sibling(id)? else {
        return Ok(unchanged());
    };
    let next = doc.get(next_id)?.clone();
    if !node.can_merge_with(&next) {
        return Ok(unchanged());
    }

    tracing::debug!(node = %id, next = %next_id, "merge");
    match (&node.kind, &next.kind) {
        (NodeKind::Text { text: left }, NodeKind::Text { text: right }) => {
            let joined = format!("{}{}", left, right);
            let doc = doc
                .replace(id, Arc::new(node.with_text(joined)))?
                .delete(next_id)?;
            Ok(MergeResult { doc, position: end })
        }
        _ => {
            let last_left = doc.child_ids(id).last().copied();
            let first_right = doc.child_ids(next_id).first().copied();
            let doc = doc
                .splice(id, end.offset, 0, doc.children(next_id))?
                .delete(next_id)?;

            match (last_left, first_right) {
                (Some(last_left), Some(_)) => merge(&doc, last_left),
                _ => Ok(MergeResult { doc, position: end }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::to_tree;

    fn paragraph_with(texts: &[&str]) -> (Doc, NodeId, Vec<NodeId>) {
        let paragraph = Node::paragraph();
        let paragraph_id = paragraph.id;
        let doc = Doc::new();
        let mut doc = doc.insert_last(doc.root(), paragraph).unwrap();
        let mut ids = Vec::new();
        for text in texts {
            let node = Node::text(*text);
            ids.push(node.id);
            doc = doc.insert_last(paragraph_id, node).unwrap();
        }
        (doc, paragraph_id, ids)
    }

    #[test]
    fn test_split_text() {
        let (doc, _, ids) = paragraph_with(&["0123456789"]);
        let t = ids[0];

        let result = split(&doc, t, Position::new(t, 4)).unwrap();
        let right = result.right.unwrap();

        assert_eq!(result.left, Some(t));
        assert_eq!(result.doc.get(t).unwrap().text_content(), Some("0123"));
        assert_eq!(result.doc.get(right).unwrap().text_content(), Some("456789"));
        assert_eq!(result.doc.next_sibling(t).unwrap(), Some(right));

        let merged = merge(&result.doc, t).unwrap();
        assert_eq!(merged.doc.get(t).unwrap().text_content(), Some("0123456789"));
        assert!(!merged.doc.contains(right));
        assert_eq!(merged.position, Position::new(t, 4));
    }

    #[test]
    fn test_split_at_boundaries_is_noop() {
        let (doc, _, ids) = paragraph_with(&["abc"]);
        let t = ids[0];

        let start = split(&doc, t, Position::new(t, 0)).unwrap();
        assert_eq!((start.left, start.right), (None, Some(t)));

        let end = split(&doc, t, Position::new(t, 3)).unwrap();
        assert_eq!((end.left, end.right), (Some(t), None));
        assert_eq!(end.doc.node_count(), doc.node_count());
    }

    #[test]
    fn test_split_container_moves_children() {
        let (doc, p, ids) = paragraph_with(&["a", "b", "c"]);
        let result = split(&doc, p, Position::new(p, 1)).unwrap();
        let right = result.right.unwrap();

        assert_eq!(result.doc.child_ids(p), &ids[..1]);
        assert_eq!(result.doc.child_ids(right), &ids[1..]);
        assert_eq!(result.doc.next_sibling(p).unwrap(), Some(right));
        assert!(result.doc.validate().is_ok());
    }

    #[test]
    fn test_deep_split_and_merge() {
        let (doc, p, ids) = paragraph_with(&["Hello"]);
        let before = to_tree(&doc).unwrap();

        let result = split(&doc, p, Position::new(ids[0], 2)).unwrap();
        let right = result.right.unwrap();
        let right_text = result.doc.child_ids(right)[0];

        assert_eq!(result.doc.child_count(result.doc.root()), 2);
        assert_eq!(result.doc.get(ids[0]).unwrap().text_content(), Some("He"));
        assert_eq!(result.doc.get(right_text).unwrap().text_content(), Some("llo"));

        let merged = merge(&result.doc, p).unwrap();
        assert_eq!(to_tree(&merged.doc).unwrap(), before);
        assert_eq!(merged.position, Position::new(ids[0], 2));
    }

    #[test]
    fn test_split_outside_subtree_fails() {
        let (doc, p, _) = paragraph_with(&["x"]);
        let other = Node::paragraph();
        let other_id = other.id;
        let doc = doc.insert_last(doc.root(), other).unwrap();

        assert!(matches!(
            split(&doc, other_id, Position::new(p, 0)),
            Err(DocError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_root_cannot_be_split() {
        let (doc, _, ids) = paragraph_with(&["ab"]);
        let root = doc.root();
        let doc = doc.insert_last(root, Node::paragraph()).unwrap();

        assert!(split(&doc, root, Position::new(root, 1)).is_err());
        assert!(split(&doc, root, Position::new(ids[0], 1)).is_err());
        assert!(split(&doc, root, Position::new(root, 0)).is_ok());
    }

    #[test]
    fn test_merge_incompatible_is_noop() {
        let (doc, p, ids) = paragraph_with(&["a"]);
        let doc = doc.insert_last(p, Node::code()).unwrap();

        let result = merge(&doc, ids[0]).unwrap();
        assert_eq!(result.position, Position::new(ids[0], 1));
        assert_eq!(result.doc.child_count(p), 2);
    }

    #[test]
    fn test_merge_without_sibling_is_noop() {
        let (doc, p, _) = paragraph_with(&["a"]);
        let result = merge(&doc, p).unwrap();

        assert_eq!(result.position, Position::new(p, 1));
        assert_eq!(result.doc.node_count(), doc.node_count());
    }

    #[test]
    fn test_merge_empty_container() {
        let (doc, p, ids) = paragraph_with(&["a"]);
        let empty = Node::paragraph();
        let empty_id = empty.id;
        let doc = doc.insert_after(p, empty).unwrap();

        let result = merge(&doc, p).unwrap();
        assert!(!result.doc.contains(empty_id));
        assert_eq!(result.doc.child_ids(p), &ids[..]);
        assert_eq!(result.position, Position::new(p, 1));
    }

    #[test]
    fn test_split_unicode_text() {
        let (doc, _, ids) = paragraph_with(&["héllo"]);
        let t = ids[0];

        let result = split(&doc, t, Position::new(t, 2)).unwrap();
        let right = result.right.unwrap();
        assert_eq!(result.doc.get(t).unwrap().text_content(), Some("hé"));
        assert_eq!(result.doc.get(right).unwrap().text_content(), Some("llo"));
    }
}
