//! Vector index client trait and filter types.
//!
//! Defines the capability set the sync coordinator and search service need
//! from the index. Implementations must be thread-safe for concurrent use.

use async_trait::async_trait;
use serde_json::Value;

use curator_types::{Chunk, ChunkPayload, ScoredChunk};

use crate::error::IndexError;

/// Equality filter applied to a payload field during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollFilter {
    pub key: String,
    pub value: Value,
}

impl ScrollFilter {
    /// Match points whose payload field `key` equals `value`.
    pub fn field_equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Typed operations against the vector index.
///
/// Writes are full overwrites: `replace_vector` replaces the whole stored
/// vector and `overwrite_payload` replaces the whole payload (not a merge),
/// so no stale fields survive a previous schema shape.
#[async_trait]
pub trait VectorIndexClient: Send + Sync {
    /// Fetch a single point by id, payload and vector included.
    async fn retrieve(&self, id: &str) -> Result<Chunk, IndexError>;

    /// Replace the stored vector for one id. Full overwrite.
    async fn replace_vector(&self, id: &str, vector: &[f32]) -> Result<(), IndexError>;

    /// Replace the stored payload for one id. Full overwrite, not merge.
    async fn overwrite_payload(&self, id: &str, payload: &ChunkPayload)
        -> Result<(), IndexError>;

    /// Bounded scan of points in stable index order, optionally filtered.
    /// Vectors are not fetched.
    async fn scroll(
        &self,
        limit: usize,
        filter: Option<ScrollFilter>,
    ) -> Result<Vec<Chunk>, IndexError>;

    /// Nearest-neighbor search, ordered by non-increasing similarity.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Number of points in the collection.
    async fn point_count(&self) -> Result<u64, IndexError>;
}
