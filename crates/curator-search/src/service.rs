//! Search service over the vector index.

use std::sync::Arc;

use tokio::task;
use tracing::debug;

use curator_embeddings::{EmbeddingError, EmbeddingModel};
use curator_index::{ScrollFilter, VectorIndexClient};
use curator_types::SearchHit;

use crate::error::SearchError;

/// Result cap applied when the caller passes 0.
pub const DEFAULT_LIMIT: usize = 20;

/// Scan bound for the per-document chunk listing.
pub const DOCUMENT_SCAN_LIMIT: usize = 1000;

/// Default scan bound for lexical search.
const DEFAULT_SCAN_LIMIT: usize = 500;

/// The two query modes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Lexical,
    Vector,
}

/// Serves keyword and similarity queries against the chunk index.
pub struct SearchService {
    index: Arc<dyn VectorIndexClient>,
    embedder: Option<Arc<dyn EmbeddingModel>>,
    scan_limit: usize,
}

impl SearchService {
    /// Service without an embedding model: lexical mode only.
    pub fn new(index: Arc<dyn VectorIndexClient>) -> Self {
        Self {
            index,
            embedder: None,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Attach an embedding model, enabling vector mode.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingModel>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Override the lexical scan bound.
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    /// Dispatch a query to the requested mode.
    pub async fn search(
        &self,
        mode: SearchMode,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        match mode {
            SearchMode::Lexical => self.lexical(query, limit).await,
            SearchMode::Vector => self.vector(query, limit).await,
        }
    }

    /// Keyword search: scan up to the scan bound, keep chunks whose
    /// `content` or `original_text` contains the query case-insensitively,
    /// preserve scan order, truncate to `limit`. No relevance score.
    ///
    /// Best-effort by construction: chunks beyond the scan bound are never
    /// considered, so this is not exhaustive on large collections. That
    /// ceiling is part of the contract, not a bug.
    pub async fn lexical(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let limit = effective_limit(limit);
        debug!(query, limit, scan_limit = self.scan_limit, "Lexical search");

        let chunks = self.index.scroll(self.scan_limit, None).await?;
        let scanned = chunks.len();

        let hits: Vec<SearchHit> = chunks
            .into_iter()
            .filter(|chunk| chunk.payload.matches(query))
            .take(limit)
            .map(SearchHit::from)
            .collect();

        debug!(scanned, matched = hits.len(), "Lexical search complete");
        Ok(hits)
    }

    /// Similarity search: embed the query, then ask the index for the
    /// nearest neighbors. Scores come back highest first.
    pub async fn vector(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let limit = effective_limit(limit);
        debug!(query, limit, "Vector search");

        let embedder = self.embedder.clone().ok_or_else(|| {
            SearchError::Embedding(EmbeddingError::ModelNotFound(
                "no embedding model configured".to_string(),
            ))
        })?;

        let owned = query.to_string();
        let embedding = task::spawn_blocking(move || embedder.embed(&owned))
            .await
            .map_err(|e| {
                SearchError::Embedding(EmbeddingError::InvalidInput(format!(
                    "embedding task aborted: {e}"
                )))
            })??;

        let scored = self.index.search(&embedding.values, limit).await?;
        Ok(scored.into_iter().map(SearchHit::from).collect())
    }

    /// All chunks belonging to one document, by `file_name` equality.
    pub async fn chunks_for_document(
        &self,
        file_name: &str,
    ) -> Result<Vec<SearchHit>, SearchError> {
        debug!(file_name, "Listing chunks for document");
        let filter = ScrollFilter::field_equals("file_name", file_name);
        let chunks = self.index.scroll(DOCUMENT_SCAN_LIMIT, Some(filter)).await?;
        Ok(chunks.into_iter().map(SearchHit::from).collect())
    }
}

fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}
