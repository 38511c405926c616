//! # Tree Serialization
//!
//! Converts a [`Doc`] to and from a plain nested tree that serde can write as
//! JSON:
//!
//! ```json
//! { "type": "root", "children": [
//!     { "type": "paragraph", "children": [
//!         { "type": "text", "text": "Hello" },
//!         { "type": "link", "attributes": { "href": "/a" }, "children": [...] }
//!     ] }
//! ] }
//! ```
//!
//! Node ids are not part of the format. Loading always allocates fresh ids.
//! Types are resolved through a [`NodeRegistry`], so unknown tags fail loudly
//! instead of being dropped.

use crate::document::Doc;
use crate::errors::EditorError;
use crate::node::{Node, NodeKind};
use quire_common::{DocResult, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Serialized form of one node and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    fn attribute(&self, name: &str) -> Result<&str, EditorError> {
        self.attributes.get(name).map(String::as_str).ok_or_else(|| {
            EditorError::InvalidTree(format!(
                "'{}' node is missing attribute '{}'",
                self.node_type, name
            ))
        })
    }
}

/// Builds a node payload from its serialized form (children excluded)
pub type NodeConstructor = fn(&TreeNode) -> Result<Node, EditorError>;

/// Maps type tags to constructors
pub struct NodeRegistry {
    constructors: HashMap<String, NodeConstructor>,
}

impl NodeRegistry {
    /// Registry with every built-in node type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("root", |_| Ok(Node::root()));
        registry.register("paragraph", |_| Ok(Node::paragraph()));
        registry.register("text", |tree| {
            let text = tree.text.as_deref().ok_or_else(|| {
                EditorError::InvalidTree("'text' node is missing its text".to_string())
            })?;
            Ok(Node::text(text))
        });
        registry.register("link", |tree| Ok(Node::link(tree.attribute("href")?)));
        registry.register("code", |_| Ok(Node::code()));
        registry
    }

    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `tag`
    pub fn register(&mut self, tag: impl Into<String>, constructor: NodeConstructor) {
        self.constructors.insert(tag.into(), constructor);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn construct(&self, tree: &TreeNode) -> Result<Node, EditorError> {
        let constructor = self
            .constructors
            .get(&tree.node_type)
            .ok_or_else(|| EditorError::UnknownNodeType(tree.node_type.clone()))?;
        constructor(tree)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize the whole document
pub fn to_tree(doc: &Doc) -> DocResult<TreeNode> {
    node_to_tree(doc, doc.root())
}

fn node_to_tree(doc: &Doc, id: NodeId) -> DocResult<TreeNode> {
    let node = doc.get(id)?;
    let tree = TreeNode::new(node.node_type().tag());
    let tree = match &node.kind {
        NodeKind::Text { text } => tree.with_text(text.clone()),
        NodeKind::Link { href } => tree.with_attribute("href", href.clone()),
        NodeKind::Root | NodeKind::Paragraph | NodeKind::Code => tree,
    };

    let children = doc
        .child_ids(id)
        .iter()
        .map(|&child| node_to_tree(doc, child))
        .collect::<DocResult<Vec<_>>>()?;
    Ok(tree.with_children(children))
}

/// Build a document from a serialized tree whose top node is the root
pub fn from_tree(tree: &TreeNode, registry: &NodeRegistry) -> Result<Doc, EditorError> {
    let root = registry.construct(tree)?;
    if !root.is_root() {
        return Err(EditorError::InvalidTree(format!(
            "top-level node must be 'root', found '{}'",
            tree.node_type
        )));
    }

    let mut doc = Doc::new();
    let root_id = doc.root();
    for child in &tree.children {
        doc = insert_tree(doc, root_id, child, registry)?;
    }

    tracing::debug!(nodes = doc.node_count(), "loaded document tree");
    Ok(doc)
}

fn insert_tree(
    doc: Doc,
    parent: NodeId,
    tree: &TreeNode,
    registry: &NodeRegistry,
) -> Result<Doc, EditorError> {
    let node = registry.construct(tree)?;
    if node.is_root() {
        return Err(EditorError::InvalidTree(
            "'root' may only appear at the top of the tree".to_string(),
        ));
    }
    if node.is_text() && !tree.children.is_empty() {
        return Err(EditorError::InvalidTree(
            "'text' nodes cannot have children".to_string(),
        ));
    }

    let id = node.id;
    let mut doc = doc.insert_last(parent, node)?;
    for child in &tree.children {
        doc = insert_tree(doc, id, child, registry)?;
    }
    Ok(doc)
}

pub fn to_json(doc: &Doc) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(&to_tree(doc)?)?)
}

pub fn from_json(json: &str, registry: &NodeRegistry) -> Result<Doc, EditorError> {
    let tree: TreeNode = serde_json::from_str(json)?;
    from_tree(&tree, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        TreeNode::new("root").with_children(vec![
            TreeNode::new("paragraph").with_children(vec![
                TreeNode::new("text").with_text("Read "),
                TreeNode::new("link")
                    .with_attribute("href", "https://example.com")
                    .with_children(vec![TreeNode::new("text").with_text("this")]),
            ]),
            TreeNode::new("paragraph")
                .with_children(vec![TreeNode::new("code")
                    .with_children(vec![TreeNode::new("text").with_text("x = 1")])]),
        ])
    }

    #[test]
    fn test_tree_round_trip() {
        let tree = sample_tree();
        let doc = from_tree(&tree, &NodeRegistry::new()).unwrap();

        assert_eq!(doc.node_count(), 8);
        assert_eq!(doc.text_content(), "Read thisx = 1");
        assert!(doc.validate().is_ok());
        assert_eq!(to_tree(&doc).unwrap(), tree);
    }

    #[test]
    fn test_json_shape() {
        let doc = from_tree(&sample_tree(), &NodeRegistry::new()).unwrap();
        let json = to_json(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "root");
        assert_eq!(value["children"][0]["children"][0]["text"], "Read ");
        assert_eq!(
            value["children"][0]["children"][1]["attributes"]["href"],
            "https://example.com"
        );
        // Empty collections are omitted
        assert!(value["children"][0]["children"][0].get("children").is_none());
    }

    #[test]
    fn test_loading_allocates_fresh_ids() {
        let registry = NodeRegistry::new();
        let a = from_tree(&sample_tree(), &registry).unwrap();
        let b = from_tree(&sample_tree(), &registry).unwrap();
        assert_ne!(a.root(), b.root());
        assert_ne!(a.child_ids(a.root()), b.child_ids(b.root()));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{ "type": "root", "children": [ { "type": "table" } ] }"#;
        let err = from_json(json, &NodeRegistry::new()).unwrap_err();
        assert!(matches!(err, EditorError::UnknownNodeType(tag) if tag == "table"));
    }

    #[test]
    fn test_malformed_trees_are_rejected() {
        let registry = NodeRegistry::new();

        let not_root = TreeNode::new("paragraph");
        assert!(matches!(
            from_tree(&not_root, &registry),
            Err(EditorError::InvalidTree(_))
        ));

        let nested_root = TreeNode::new("root").with_children(vec![TreeNode::new("root")]);
        assert!(matches!(
            from_tree(&nested_root, &registry),
            Err(EditorError::InvalidTree(_))
        ));

        let text_with_children = TreeNode::new("root").with_children(vec![TreeNode::new("text")
            .with_text("a")
            .with_children(vec![TreeNode::new("text").with_text("b")])]);
        assert!(matches!(
            from_tree(&text_with_children, &registry),
            Err(EditorError::InvalidTree(_))
        ));

        let link_without_href = TreeNode::new("root").with_children(vec![TreeNode::new("link")]);
        assert!(matches!(
            from_tree(&link_without_href, &registry),
            Err(EditorError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_custom_constructor() {
        let mut registry = NodeRegistry::new();
        registry.register("heading", |_| Ok(Node::paragraph()));
        assert!(registry.is_registered("heading"));

        let tree = TreeNode::new("root").with_children(vec![TreeNode::new("heading")]);
        let doc = from_tree(&tree, &registry).unwrap();
        let first = doc.child_ids(doc.root())[0];
        assert!(doc.get(first).unwrap().is_block());
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = NodeRegistry::empty();
        assert!(matches!(
            from_tree(&TreeNode::new("root"), &registry),
            Err(EditorError::UnknownNodeType(_))
        ));
    }
}
