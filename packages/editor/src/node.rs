//! # Node Variants
//!
//! Typed payloads stored in a [`Doc`](crate::Doc). A node carries only its own
//! content; structure (parent, children, siblings) lives in the document's
//! index maps.

use quire_common::NodeId;
use serde::Serialize;

/// Variant tag, used for merge compatibility and the serializer registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Root,
    Paragraph,
    Text,
    Link,
    Code,
}

impl NodeType {
    pub fn tag(self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Paragraph => "paragraph",
            NodeType::Text => "text",
            NodeType::Link => "link",
            NodeType::Code => "code",
        }
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    /// Top of the tree, exactly one per document
    Root,

    /// Block container
    Paragraph,

    /// Character content, never has children
    Text { text: String },

    /// Inline container pointing somewhere
    Link { href: String },

    /// Inline code span
    Code,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Paragraph => NodeType::Paragraph,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Link { .. } => NodeType::Link,
            NodeKind::Code => NodeType::Code,
        }
    }
}

/// A document node: identity plus payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with a freshly allocated id
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            kind,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    pub fn paragraph() -> Self {
        Self::new(NodeKind::Paragraph)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() })
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(NodeKind::Link { href: href.into() })
    }

    pub fn code() -> Self {
        Self::new(NodeKind::Code)
    }

    /// Same identity, different payload
    pub fn with_kind(&self, kind: NodeKind) -> Self {
        Self { id: self.id, kind }
    }

    /// Same payload, text replaced. Only meaningful for text nodes.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        self.with_kind(NodeKind::Text { text: text.into() })
    }

    /// Fresh node of the same variant and attributes, used as a split's right half
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.kind.clone())
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Paragraph-level container
    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Paragraph)
    }

    /// Anything that holds children (the root included)
    pub fn is_container(&self) -> bool {
        !self.is_text()
    }

    /// Whether `self` and its next sibling `other` may collapse into one node.
    ///
    /// Links only merge when they point at the same place; otherwise one of
    /// the two targets would be lost.
    pub fn can_merge_with(&self, other: &Node) -> bool {
        match (&self.kind, &other.kind) {
            (NodeKind::Text { .. }, NodeKind::Text { .. }) => true,
            (NodeKind::Paragraph, NodeKind::Paragraph) => true,
            (NodeKind::Code, NodeKind::Code) => true,
            (NodeKind::Link { href: a }, NodeKind::Link { href: b }) => a == b,
            _ => false,
        }
    }
}

/// Number of characters in `text`
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the character at `offset`, or `text.len()` past the end
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
