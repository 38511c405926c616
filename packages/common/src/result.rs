use crate::error::DocError;

/// Result type for document-model operations
pub type DocResult<T> = Result<T, DocError>;
