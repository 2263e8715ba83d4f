//! Search error types.

use thiserror::Error;

use curator_embeddings::EmbeddingError;
use curator_index::IndexError;

/// Errors that can occur during a search request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Query embedding failed. Fatal for vector mode — there is no partial
    /// result and no fallback to lexical mode.
    #[error("Query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The index call failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Empty or whitespace-only query.
    #[error("Query must not be empty")]
    EmptyQuery,
}
