use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle of a document node.
///
/// Ids come from a process-wide counter, so they are unique across every
/// document in the process and never reused, even after the node is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate the next id
    pub fn next() -> Self {
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let id1 = NodeId::next();
        let id2 = NodeId::next();
        let id3 = NodeId::next();

        // Monotonic, never reused
        assert!(id1 < id2);
        assert!(id2 < id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_display() {
        let id = NodeId::next();
        assert_eq!(id.to_string(), format!("#{}", id.as_u64()));
    }

    #[test]
    fn test_serializes_as_number() {
        let id = NodeId::next();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.as_u64().to_string());
    }
}
