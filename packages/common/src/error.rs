use crate::id::NodeId;
use thiserror::Error;

/// Precondition violations raised by the document model.
///
/// None of these are transient. Each one means the caller handed the model
/// bad input (usually a stale id) or asked for an edit the operators do not model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid offset {offset} for node {node_id} (length {length})")]
    InvalidOffset {
        node_id: NodeId,
        offset: usize,
        length: usize,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unsupported range: {0}")]
    UnsupportedRange(String),
}

impl DocError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        DocError::InvalidOperation(message.into())
    }

    pub fn unsupported_range(message: impl Into<String>) -> Self {
        DocError::UnsupportedRange(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let id = NodeId::next();
        let err = DocError::InvalidOffset {
            node_id: id,
            offset: 9,
            length: 3,
        };
        assert_eq!(
            err.to_string(),
            format!("Invalid offset 9 for node {} (length 3)", id)
        );

        let err = DocError::invalid_operation("the root node cannot be deleted");
        assert_eq!(
            err.to_string(),
            "Invalid operation: the root node cannot be deleted"
        );
    }
}
