//! # Document Store
//!
//! `Doc` is an immutable snapshot of the whole tree. It is kept as three
//! index maps plus a root pointer:
//!
//! ```text
//! nodes:    NodeId -> Arc<Node>        payloads
//! parents:  NodeId -> NodeId           every id except root, exactly once
//! children: NodeId -> Vec<NodeId>      ordered, no duplicates
//! ```
//!
//! Every mutation returns a new `Doc`. The maps are cloned per edit while the
//! `Arc<Node>` payloads are shared between snapshots, so an edit costs
//! O(node count) and never copies node content it did not touch.
//!
//! Inserting a node that already has a parent moves it; a node id can never
//! appear twice in the tree.

use crate::node::{char_len, Node, NodeKind};
use crate::visitor::{walk_doc, Visitor};
use quire_common::{Address, DocError, DocResult, NodeId, Position};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable document snapshot
///
/// Two snapshots are equal when they hold the same nodes in the same places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    root: NodeId,
    nodes: HashMap<NodeId, Arc<Node>>,
    parents: HashMap<NodeId, NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl Doc {
    /// Create a document holding only a root node
    pub fn new() -> Self {
        let root = Node::root();
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, Arc::new(root));

        Self {
            root: root_id,
            nodes,
            parents: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    // ---- Queries ----

    pub fn get(&self, id: NodeId) -> DocResult<&Arc<Node>> {
        self.nodes.get(&id).ok_or(DocError::NodeNotFound(id))
    }

    pub fn get_or_none(&self, id: NodeId) -> Option<&Arc<Node>> {
        self.nodes.get(&id)
    }

    /// Child ids in order; empty for leaves and unknown ids
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Child payloads in order; empty for leaves and unknown ids
    pub fn children(&self, id: NodeId) -> Vec<Arc<Node>> {
        self.child_ids(id)
            .iter()
            .filter_map(|child| self.nodes.get(child).cloned())
            .collect()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.child_ids(id).len()
    }

    pub fn parent_or_none(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub fn parent(&self, id: NodeId) -> DocResult<NodeId> {
        self.get(id)?;
        self.parent_or_none(id)
            .ok_or_else(|| DocError::invalid_operation(format!("node {} has no parent", id)))
    }

    /// Index of `id` in its parent's child list
    pub fn offset(&self, id: NodeId) -> DocResult<usize> {
        let parent = self.parent(id)?;
        self.child_ids(parent)
            .iter()
            .position(|child| *child == id)
            .ok_or(DocError::NodeNotFound(id))
    }

    /// The container position immediately before `id`
    pub fn position_of(&self, id: NodeId) -> DocResult<Position> {
        Ok(Position::new(self.parent(id)?, self.offset(id)?))
    }

    /// Characters for text nodes, children for everything else
    pub fn length(&self, id: NodeId) -> DocResult<usize> {
        let node = self.get(id)?;
        Ok(match &node.kind {
            NodeKind::Text { text } => char_len(text),
            _ => self.child_count(id),
        })
    }

    pub fn previous_sibling(&self, id: NodeId) -> DocResult<Option<NodeId>> {
        let Some(parent) = self.parent_or_none(id) else {
            self.get(id)?;
            return Ok(None);
        };
        let offset = self.offset(id)?;
        Ok(offset
            .checked_sub(1)
            .map(|index| self.child_ids(parent)[index]))
    }

    pub fn next_sibling(&self, id: NodeId) -> DocResult<Option<NodeId>> {
        let Some(parent) = self.parent_or_none(id) else {
            self.get(id)?;
            return Ok(None);
        };
        let offset = self.offset(id)?;
        Ok(self.child_ids(parent).get(offset + 1).copied())
    }

    /// Ids from the root down to `id`, both included
    pub fn path(&self, id: NodeId) -> DocResult<Vec<NodeId>> {
        self.get(id)?;
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_or_none(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// True if `id` is `ancestor` or lies below it
    pub fn is_in_subtree(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent_or_none(node);
        }
        false
    }

    /// Nearest node, starting at `id` itself, that satisfies `predicate`
    pub fn find_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&Node) -> bool,
    ) -> DocResult<Option<NodeId>> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if predicate(self.get(node_id)?) {
                return Ok(Some(node_id));
            }
            current = self.parent_or_none(node_id);
        }
        Ok(None)
    }

    /// Deepest node whose subtree holds both `a` and `b`
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> DocResult<NodeId> {
        let path_a = self.path(a)?;
        let path_b = self.path(b)?;
        path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                DocError::unsupported_range(format!("{} and {} share no ancestor", a, b))
            })
    }

    /// The child of `ancestor` on the way down to `descendant`
    pub fn child_toward(&self, ancestor: NodeId, descendant: NodeId) -> DocResult<NodeId> {
        let mut current = descendant;
        loop {
            let parent = self.parent(current)?;
            if parent == ancestor {
                return Ok(current);
            }
            current = parent;
        }
    }

    /// Deepest first position inside the subtree of `id`
    pub fn start_point(&self, id: NodeId) -> DocResult<Position> {
        let mut current = id;
        while let Some(first) = self.child_ids(current).first() {
            current = *first;
        }
        self.get(current)?;
        Ok(Position::new(current, 0))
    }

    /// Deepest last position inside the subtree of `id`
    pub fn end_point(&self, id: NodeId) -> DocResult<Position> {
        let mut current = id;
        while let Some(last) = self.child_ids(current).last() {
            current = *last;
        }
        Ok(Position::new(current, self.length(current)?))
    }

    /// Fail unless `position` addresses this snapshot
    pub fn validate_position(&self, position: Position) -> DocResult<()> {
        let length = self.length(position.node_id)?;
        if position.offset > length {
            return Err(DocError::InvalidOffset {
                node_id: position.node_id,
                offset: position.offset,
                length,
            });
        }
        Ok(())
    }

    /// Concatenated text of the whole document, in document order
    pub fn text_content(&self) -> String {
        struct TextCollector(String);

        impl Visitor for TextCollector {
            fn visit_text(&mut self, _doc: &Doc, _node: &Node, text: &str) {
                self.0.push_str(text);
            }
        }

        let mut collector = TextCollector(String::new());
        walk_doc(&mut collector, self);
        collector.0
    }

    /// Check the structural invariants of the index maps
    pub fn validate(&self) -> DocResult<()> {
        if self.parents.contains_key(&self.root) {
            return Err(DocError::invalid_operation("the root has a parent"));
        }

        let mut seen = HashSet::new();
        for (parent, list) in &self.children {
            self.get(*parent)?;
            for child in list {
                self.get(*child)?;
                if !seen.insert(*child) {
                    return Err(DocError::invalid_operation(format!(
                        "node {} appears twice in the tree",
                        child
                    )));
                }
                if self.parents.get(child) != Some(parent) {
                    return Err(DocError::invalid_operation(format!(
                        "parent index of {} is out of sync",
                        child
                    )));
                }
            }
        }

        for id in self.nodes.keys() {
            if *id != self.root && !seen.contains(id) {
                return Err(DocError::invalid_operation(format!(
                    "node {} is detached",
                    id
                )));
            }
        }
        if seen.len() != self.parents.len() {
            return Err(DocError::invalid_operation("stale parent entries"));
        }
        Ok(())
    }

    // ---- Document order ----

    /// Total document order over nodes and positions.
    ///
    /// Each side becomes the list of sibling offsets along its root path, a
    /// position appending its own offset. The lists compare
    /// lexicographically with a strict prefix first, so a node sorts equal
    /// to the container position right before it and before anything
    /// inside it.
    pub fn compare(&self, a: impl Into<Address>, b: impl Into<Address>) -> DocResult<Ordering> {
        let key_a = self.order_key(a.into())?;
        let key_b = self.order_key(b.into())?;
        Ok(key_a.cmp(&key_b))
    }

    fn order_key(&self, address: Address) -> DocResult<Vec<usize>> {
        let (id, own_offset) = match address {
            Address::Node(id) => (id, None),
            Address::Position(position) => {
                self.validate_position(position)?;
                (position.node_id, Some(position.offset))
            }
        };

        let mut key = self
            .path(id)?
            .iter()
            .skip(1)
            .map(|node| self.offset(*node))
            .collect::<DocResult<Vec<_>>>()?;
        key.extend(own_offset);
        Ok(key)
    }

    // ---- Mutations ----

    /// Insert `node` as a child at `position`, moving it if it already has a parent
    pub fn insert(&self, position: Position, node: impl Into<Arc<Node>>) -> DocResult<Doc> {
        let mut next = self.clone();
        next.attach(position.node_id, position.offset, node.into())?;
        Ok(next)
    }

    pub fn insert_before(&self, sibling: NodeId, node: impl Into<Arc<Node>>) -> DocResult<Doc> {
        self.insert(self.position_of(sibling)?, node)
    }

    pub fn insert_after(&self, sibling: NodeId, node: impl Into<Arc<Node>>) -> DocResult<Doc> {
        let position = self.position_of(sibling)?;
        self.insert(Position::new(position.node_id, position.offset + 1), node)
    }

    pub fn insert_first(&self, parent: NodeId, node: impl Into<Arc<Node>>) -> DocResult<Doc> {
        self.insert(Position::new(parent, 0), node)
    }

    pub fn insert_last(&self, parent: NodeId, node: impl Into<Arc<Node>>) -> DocResult<Doc> {
        self.insert(Position::new(parent, self.child_count(parent)), node)
    }

    /// Remove `id` and its whole subtree
    pub fn delete(&self, id: NodeId) -> DocResult<Doc> {
        if id == self.root {
            return Err(DocError::invalid_operation("the root node cannot be deleted"));
        }
        self.get(id)?;

        let mut next = self.clone();
        next.detach(id);
        next.destroy(id);
        Ok(next)
    }

    /// Replace `delete_count` children of `parent_id` starting at `offset` with `nodes`.
    ///
    /// A removed child that reappears in `nodes` is moved, not recreated; the
    /// remaining removed children are destroyed along with their subtrees.
    pub fn splice(
        &self,
        parent_id: NodeId,
        offset: usize,
        delete_count: usize,
        nodes: Vec<Arc<Node>>,
    ) -> DocResult<Doc> {
        let parent = self.get(parent_id)?;
        if parent.is_text() {
            return Err(DocError::invalid_operation(format!(
                "text node {} cannot hold children",
                parent_id
            )));
        }

        let length = self.child_count(parent_id);
        let end = offset.checked_add(delete_count).unwrap_or(usize::MAX);
        if end > length {
            return Err(DocError::InvalidOffset {
                node_id: parent_id,
                offset: end,
                length,
            });
        }

        let mut next = self.clone();
        let removed: Vec<NodeId> = match next.children.get_mut(&parent_id) {
            Some(list) => list.drain(offset..end).collect(),
            None => Vec::new(),
        };
        for id in &removed {
            next.parents.remove(id);
        }

        let mut at = offset;
        for node in nodes {
            at = next.attach(parent_id, at, node)? + 1;
        }

        for id in removed {
            if !next.parents.contains_key(&id) {
                next.destroy(id);
            }
        }
        Ok(next)
    }

    /// Swap the payload at `id`'s slot for `node`.
    ///
    /// Returns an unchanged snapshot when `node` is the very same `Arc`.
    pub fn replace(&self, id: NodeId, node: Arc<Node>) -> DocResult<Doc> {
        let current = self.get(id)?;
        if Arc::ptr_eq(current, &node) {
            return Ok(self.clone());
        }

        if id == self.root {
            if node.id != id || !node.is_root() {
                return Err(DocError::invalid_operation(
                    "the root can only be replaced by a root payload with the same id",
                ));
            }
            let mut next = self.clone();
            next.nodes.insert(id, node);
            return Ok(next);
        }

        let position = self.position_of(id)?;
        self.splice(position.node_id, position.offset, 1, vec![node])
    }

    pub fn update(&self, id: NodeId, f: impl FnOnce(&Arc<Node>) -> Arc<Node>) -> DocResult<Doc> {
        let node = f(self.get(id)?);
        self.replace(id, node)
    }

    /// Link `node` under `parent_id` at `offset`, detaching it first if needed.
    /// Returns the index it ended up at.
    fn attach(&mut self, parent_id: NodeId, offset: usize, node: Arc<Node>) -> DocResult<usize> {
        let id = node.id;
        let parent = self.get(parent_id)?;
        if parent.is_text() {
            return Err(DocError::invalid_operation(format!(
                "text node {} cannot hold children",
                parent_id
            )));
        }
        if id == self.root || node.is_root() {
            return Err(DocError::invalid_operation("the root cannot be inserted"));
        }
        if self.is_in_subtree(id, parent_id) {
            return Err(DocError::invalid_operation(format!(
                "inserting {} under {} would create a cycle",
                id, parent_id
            )));
        }

        let length = self.child_count(parent_id);
        if offset > length {
            return Err(DocError::InvalidOffset {
                node_id: parent_id,
                offset,
                length,
            });
        }

        let mut offset = offset;
        if let Some((old_parent, old_offset)) = self.detach(id) {
            if old_parent == parent_id && old_offset < offset {
                offset -= 1;
            }
        }

        self.children.entry(parent_id).or_default().insert(offset, id);
        self.parents.insert(id, parent_id);
        self.nodes.insert(id, node);
        Ok(offset)
    }

    /// Unlink `id` from its parent, keeping its payload and subtree
    fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parents.remove(&id)?;
        let list = self.children.get_mut(&parent)?;
        let offset = list.iter().position(|child| *child == id)?;
        list.remove(offset);
        Some((parent, offset))
    }

    /// Drop `id` and everything below it from the index maps
    fn destroy(&mut self, id: NodeId) {
        if let Some(kids) = self.children.remove(&id) {
            for kid in kids {
                self.destroy(kid);
            }
        }
        self.parents.remove(&id);
        self.nodes.remove(&id);
    }
}

impl Default for Doc {
    fn default() -> Self {
        Self::new()
    }
}
