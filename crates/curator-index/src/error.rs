//! Vector index error types.

use thiserror::Error;

/// Errors that can occur talking to the vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Network/availability failure reaching the index.
    #[error("Index transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The index answered with a non-success status.
    #[error("Index API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Referenced point id is absent.
    #[error("Chunk not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape.
    #[error("Invalid index response: {0}")]
    InvalidResponse(String),
}

impl IndexError {
    /// Whether this error means the chunk id does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound(_))
    }
}
