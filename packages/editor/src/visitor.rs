use crate::document::Doc;
use crate::node::{Node, NodeKind};

/// Read-only traversal of a document in document order
///
/// Default implementations walk the entire tree. Override specific visit_*
/// methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, doc: &Doc, node: &Node) {
        walk_node(self, doc, node);
    }

    fn visit_text(&mut self, _doc: &Doc, _node: &Node, _text: &str) {
        // Leaf node, no children to walk
    }
}

pub fn walk_doc<V: Visitor>(visitor: &mut V, doc: &Doc) {
    if let Some(root) = doc.get_or_none(doc.root()) {
        visitor.visit_node(doc, root);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, doc: &Doc, node: &Node) {
    match &node.kind {
        NodeKind::Text { text } => visitor.visit_text(doc, node, text),
        NodeKind::Root | NodeKind::Paragraph | NodeKind::Link { .. } | NodeKind::Code => {
            for child in doc.children(node.id) {
                visitor.visit_node(doc, &child);
            }
        }
    }
}

/// Counts nodes per variant
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeStats {
    pub paragraphs: usize,
    pub texts: usize,
    pub inlines: usize,
    pub characters: usize,
}

impl NodeStats {
    pub fn collect(doc: &Doc) -> Self {
        let mut stats = Self::default();
        walk_doc(&mut stats, doc);
        stats
    }
}

impl Visitor for NodeStats {
    fn visit_node(&mut self, doc: &Doc, node: &Node) {
        match node.kind {
            NodeKind::Paragraph => self.paragraphs += 1,
            NodeKind::Link { .. } | NodeKind::Code => self.inlines += 1,
            NodeKind::Root | NodeKind::Text { .. } => {}
        }
        walk_node(self, doc, node);
    }

    fn visit_text(&mut self, _doc: &Doc, _node: &Node, text: &str) {
        self.texts += 1;
        self.characters += text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_stats() {
        let paragraph = Node::paragraph();
        let link = Node::link("/docs");
        let (paragraph_id, link_id) = (paragraph.id, link.id);

        let doc = Doc::new();
        let doc = doc
            .insert_last(doc.root(), paragraph)
            .and_then(|d| d.insert_last(paragraph_id, Node::text("see ")))
            .and_then(|d| d.insert_last(paragraph_id, link))
            .and_then(|d| d.insert_last(link_id, Node::text("docs")))
            .unwrap();

        let stats = NodeStats::collect(&doc);
        assert_eq!(
            stats,
            NodeStats {
                paragraphs: 1,
                texts: 2,
                inlines: 1,
                characters: 8,
            }
        );
    }
}
