//! Metadata store error types.

use thiserror::Error;

/// Errors that can occur talking to the metadata store.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Network/availability failure reaching the store.
    #[error("Metadata store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Metadata store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Referenced document id is absent.
    #[error("Document not found: {0}")]
    NotFound(String),
}
