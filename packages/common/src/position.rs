use crate::id::NodeId;
use serde::Serialize;
use std::fmt;

/// A point inside one document snapshot.
///
/// For a container the offset indexes its child list (`0..=child_count`);
/// for a text node it indexes characters (`0..=char_count`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub node_id: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node_id: NodeId, offset: usize) -> Self {
        Self { node_id, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.node_id, self.offset)
    }
}

/// Anything that has a place in document order: a whole node or a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Node(NodeId),
    Position(Position),
}

impl Address {
    pub fn node_id(&self) -> NodeId {
        match self {
            Address::Node(id) => *id,
            Address::Position(position) => position.node_id,
        }
    }
}

impl From<NodeId> for Address {
    fn from(id: NodeId) -> Self {
        Address::Node(id)
    }
}

impl From<Position> for Address {
    fn from(position: Position) -> Self {
        Address::Position(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_conversions() {
        let id = NodeId::next();
        let position = Position::new(id, 3);

        assert_eq!(Address::from(id), Address::Node(id));
        assert_eq!(Address::from(position), Address::Position(position));
        assert_eq!(Address::from(position).node_id(), id);
    }

    #[test]
    fn test_position_serialization() {
        let id = NodeId::next();
        let json = serde_json::to_value(Position::new(id, 2)).unwrap();
        assert_eq!(json["nodeId"], id.as_u64());
        assert_eq!(json["offset"], 2);
    }
}
