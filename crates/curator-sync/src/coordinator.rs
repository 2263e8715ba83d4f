//! Chunk sync coordinator.
//!
//! Drives one edit through a strictly ordered sequence: build the
//! replacement payload, regenerate the embedding, replace the vector,
//! overwrite the payload, then verify with a read. The order bounds the
//! inconsistency window and makes the final read authoritative.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::task;
use tracing::{debug, warn};

use curator_embeddings::EmbeddingModel;
use curator_index::VectorIndexClient;
use curator_types::ChunkPayload;

use crate::outcome::{SyncError, SyncOutcome};

/// Orchestrates "edit chunk" against the embedding generator and the
/// vector index.
///
/// Single-attempt and synchronous: no retry is performed here; retries, if
/// desired, are a caller concern. Concurrent edits to the same id are not
/// serialized either — the index's last-write-wins semantics decides
/// interleavings. An id-keyed `tokio::sync::Mutex` map around
/// [`edit_chunk`](Self::edit_chunk) would close that race if callers need
/// the guarantee.
pub struct ChunkSyncCoordinator {
    index: Arc<dyn VectorIndexClient>,
    embedder: Arc<dyn EmbeddingModel>,
}

impl ChunkSyncCoordinator {
    pub fn new(index: Arc<dyn VectorIndexClient>, embedder: Arc<dyn EmbeddingModel>) -> Self {
        Self { index, embedder }
    }

    /// Replace a chunk's text, regenerating its embedding.
    ///
    /// `extra` is the complete set of non-text payload fields the caller
    /// wants stored; the payload write is a full replace, so anything not
    /// passed here is dropped from the index. The two synchronized text
    /// fields (`content`, `original_text`) are filled in from `new_text`.
    ///
    /// Side effects: at most one vector replacement and one payload
    /// replacement; nothing is written to the metadata store.
    pub async fn edit_chunk(
        &self,
        id: &str,
        new_text: &str,
        extra: Map<String, Value>,
    ) -> Result<SyncOutcome, SyncError> {
        if new_text.trim().is_empty() {
            return Err(SyncError::EmptyText);
        }

        let payload = ChunkPayload::for_text(new_text, extra);

        // Embedding failure must not lose the text edit: record it and
        // carry on to the payload write with the vector left stale.
        let vector = self.embed_text(new_text).await;
        let mut vector_stale = vector.is_none();

        if let Some(vector) = vector {
            match self.index.replace_vector(id, &vector).await {
                Ok(()) => debug!(id, dim = vector.len(), "Vector replaced"),
                Err(e) => {
                    warn!(id, error = %e, "Vector write failed, payload update proceeds");
                    vector_stale = true;
                }
            }
        }

        // The payload overwrite is the one fatal stage: if the text cannot
        // be stored, the edit has not happened.
        self.index
            .overwrite_payload(id, &payload)
            .await
            .map_err(|cause| SyncError::PayloadWrite { cause })?;
        debug!(id, "Payload overwritten");

        Ok(self.verify(id, &payload, vector_stale).await)
    }

    /// Generate the embedding on a blocking task (candle inference can take
    /// seconds and must not stall the runtime).
    async fn embed_text(&self, text: &str) -> Option<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let owned = text.to_string();

        match task::spawn_blocking(move || embedder.embed(&owned)).await {
            Ok(Ok(embedding)) => Some(embedding.values),
            Ok(Err(e)) => {
                warn!(error = %e, "Embedding failed, vector will be stale");
                None
            }
            Err(e) => {
                warn!(error = %e, "Embedding task aborted, vector will be stale");
                None
            }
        }
    }

    /// Read the chunk back and compare payloads. The write is trusted over
    /// the read: a mismatch or a failed read downgrades the outcome but
    /// never fails the edit.
    async fn verify(&self, id: &str, written: &ChunkPayload, vector_stale: bool) -> SyncOutcome {
        match self.index.retrieve(id).await {
            Ok(chunk) if chunk.payload == *written => {
                if vector_stale {
                    SyncOutcome::PartialSuccess { vector_stale: true }
                } else {
                    debug!(id, "Edit verified");
                    SyncOutcome::Success
                }
            }
            Ok(_) => {
                warn!(id, vector_stale, "Verification read differs from written payload");
                SyncOutcome::VerificationMismatch
            }
            Err(e) => {
                warn!(id, vector_stale, error = %e, "Verification read failed");
                SyncOutcome::VerificationInconclusive
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use curator_embeddings::{Embedding, EmbeddingError, ModelInfo};
    use curator_index::{IndexError, ScrollFilter};
    use curator_types::{Chunk, ScoredChunk};

    const DIM: usize = 8;

    // Deterministic embedder: vector derived from text bytes.
    struct MockEmbedder {
        info: ModelInfo,
    }

    impl MockEmbedder {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "mock".to_string(),
                    dimension: DIM,
                    max_sequence_length: 512,
                },
            }
        }
    }

    impl EmbeddingModel for MockEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            let values: Vec<f32> = (0..DIM)
                .map(|i| {
                    text.bytes()
                        .map(|b| b as f32)
                        .sum::<f32>()
                        + i as f32
                })
                .collect();
            Ok(Embedding::new(values))
        }
    }

    struct FailingEmbedder {
        info: ModelInfo,
    }

    impl FailingEmbedder {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "failing".to_string(),
                    dimension: DIM,
                    max_sequence_length: 512,
                },
            }
        }
    }

    impl EmbeddingModel for FailingEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Err(EmbeddingError::ModelNotFound("weights missing".to_string()))
        }
    }

    #[derive(Default)]
    struct TestIndex {
        points: Mutex<Vec<Chunk>>,
        vector_writes: AtomicUsize,
        payload_writes: AtomicUsize,
        fail_vector_write: bool,
        fail_retrieve: bool,
        corrupt_on_read: bool,
    }

    impl TestIndex {
        fn with_point(chunk: Chunk) -> Self {
            Self {
                points: Mutex::new(vec![chunk]),
                ..Default::default()
            }
        }

        fn stored_vector(&self, id: &str) -> Option<Vec<f32>> {
            self.points
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .and_then(|c| c.vector.clone())
        }
    }

    #[async_trait]
    impl VectorIndexClient for TestIndex {
        async fn retrieve(&self, id: &str) -> Result<Chunk, IndexError> {
            if self.fail_retrieve {
                return Err(IndexError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            let points = self.points.lock().unwrap();
            let mut chunk = points
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| IndexError::NotFound(id.to_string()))?;
            if self.corrupt_on_read {
                chunk.payload.content = Some("lagged read".to_string());
            }
            Ok(chunk)
        }

        async fn replace_vector(&self, id: &str, vector: &[f32]) -> Result<(), IndexError> {
            self.vector_writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_vector_write {
                return Err(IndexError::Api {
                    status: 500,
                    message: "wal full".to_string(),
                });
            }
            let mut points = self.points.lock().unwrap();
            let chunk = points
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| IndexError::NotFound(id.to_string()))?;
            chunk.vector = Some(vector.to_vec());
            Ok(())
        }

        async fn overwrite_payload(
            &self,
            id: &str,
            payload: &ChunkPayload,
        ) -> Result<(), IndexError> {
            self.payload_writes.fetch_add(1, Ordering::SeqCst);
            let mut points = self.points.lock().unwrap();
            let chunk = points
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| IndexError::NotFound(id.to_string()))?;
            chunk.payload = payload.clone();
            Ok(())
        }

        async fn scroll(
            &self,
            limit: usize,
            _filter: Option<ScrollFilter>,
        ) -> Result<Vec<Chunk>, IndexError> {
            Ok(self
                .points
                .lock()
                .unwrap()
                .iter()
                .take(limit)
                .cloned()
                .collect())
        }

        async fn search(
            &self,
            _vector: &[f32],
            _limit: usize,
        ) -> Result<Vec<ScoredChunk>, IndexError> {
            Ok(vec![])
        }

        async fn point_count(&self) -> Result<u64, IndexError> {
            Ok(self.points.lock().unwrap().len() as u64)
        }
    }

    fn seeded_chunk() -> Chunk {
        Chunk::new(
            "c1",
            ChunkPayload::for_text("old text", Map::new()),
        )
        .with_vector(vec![9.0; DIM])
    }

    fn coordinator(index: Arc<TestIndex>) -> ChunkSyncCoordinator {
        ChunkSyncCoordinator::new(index, Arc::new(MockEmbedder::new()))
    }

    #[tokio::test]
    async fn test_success_keeps_text_fields_in_sync() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord = coordinator(index.clone());

        let outcome = coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Success);

        let chunk = index.retrieve("c1").await.unwrap();
        assert_eq!(chunk.payload.content.as_deref(), Some("new text"));
        assert_eq!(chunk.payload.content, chunk.payload.original_text);
    }

    #[tokio::test]
    async fn test_success_replaces_vector_with_embedding_of_new_text() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord = coordinator(index.clone());

        coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();

        let expected = MockEmbedder::new().embed("new text").unwrap().values;
        assert_eq!(index.stored_vector("c1"), Some(expected));
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_partial_success() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord =
            ChunkSyncCoordinator::new(index.clone(), Arc::new(FailingEmbedder::new()));

        let outcome = coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::PartialSuccess { vector_stale: true });

        // Payload updated, vector untouched.
        let chunk = index.retrieve("c1").await.unwrap();
        assert_eq!(chunk.payload.content.as_deref(), Some("new text"));
        assert_eq!(index.stored_vector("c1"), Some(vec![9.0; DIM]));
        assert_eq!(index.vector_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vector_write_failure_degrades_to_partial_success() {
        let index = Arc::new(TestIndex {
            fail_vector_write: true,
            ..TestIndex::with_point(seeded_chunk())
        });
        let coord = coordinator(index.clone());

        let outcome = coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::PartialSuccess { vector_stale: true });
        assert_eq!(index.payload_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_id_fails_at_payload_stage() {
        let index = Arc::new(TestIndex::default());
        let coord = coordinator(index.clone());

        let err = coord
            .edit_chunk("missing-id", "x", Map::new())
            .await
            .unwrap_err();
        match err {
            SyncError::PayloadWrite { cause } => assert!(cause.is_not_found()),
            other => panic!("expected PayloadWrite, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verification_mismatch_is_advisory() {
        let index = Arc::new(TestIndex {
            corrupt_on_read: true,
            ..TestIndex::with_point(seeded_chunk())
        });
        let coord = coordinator(index.clone());

        let outcome = coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::VerificationMismatch);
        assert!(outcome.is_applied());
    }

    #[tokio::test]
    async fn test_verification_read_failure_is_inconclusive() {
        let index = Arc::new(TestIndex {
            fail_retrieve: true,
            ..TestIndex::with_point(seeded_chunk())
        });
        let coord = coordinator(index.clone());

        let outcome = coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::VerificationInconclusive);
    }

    #[tokio::test]
    async fn test_empty_text_rejected_before_any_write() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord = coordinator(index.clone());

        let err = coord.edit_chunk("c1", "   ", Map::new()).await.unwrap_err();
        assert!(matches!(err, SyncError::EmptyText));
        assert_eq!(index.vector_writes.load(Ordering::SeqCst), 0);
        assert_eq!(index.payload_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_at_most_one_write_per_store() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord = coordinator(index.clone());

        coord.edit_chunk("c1", "new text", Map::new()).await.unwrap();
        assert_eq!(index.vector_writes.load(Ordering::SeqCst), 1);
        assert_eq!(index.payload_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extra_fields_are_the_whole_payload() {
        let mut seeded = seeded_chunk();
        seeded
            .payload
            .extra
            .insert("stale_field".to_string(), json!("from v1 schema"));
        let index = Arc::new(TestIndex::with_point(seeded));
        let coord = coordinator(index.clone());

        let mut extra = Map::new();
        extra.insert("file_name".to_string(), json!("a.pdf"));
        extra.insert("page".to_string(), json!(2));
        coord.edit_chunk("c1", "new text", extra).await.unwrap();

        // Full replace: fields not passed by the caller do not survive.
        let chunk = index.retrieve("c1").await.unwrap();
        assert!(!chunk.payload.extra.contains_key("stale_field"));
        assert_eq!(chunk.payload.file_name.as_deref(), Some("a.pdf"));
        assert_eq!(chunk.payload.extra.get("page"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_edit_is_idempotent_for_same_text() {
        let index = Arc::new(TestIndex::with_point(seeded_chunk()));
        let coord = coordinator(index.clone());

        coord.edit_chunk("c1", "same text", Map::new()).await.unwrap();
        let first = index.retrieve("c1").await.unwrap();

        coord.edit_chunk("c1", "same text", Map::new()).await.unwrap();
        let second = index.retrieve("c1").await.unwrap();

        assert_eq!(first, second);
    }
}
