//! Error types for the editor

use quire_common::DocError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Doc(#[from] DocError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}
