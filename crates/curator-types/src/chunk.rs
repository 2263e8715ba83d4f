//! Chunk types stored in the vector index.
//!
//! A chunk is one unit of document text: an opaque id, an embedding vector,
//! and a payload of text plus provenance fields. The payload's `content` and
//! `original_text` fields are kept equal by the sync coordinator; unknown
//! fields are carried verbatim through the flattened `extra` map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload stored alongside the vector for one chunk.
///
/// `content` is the canonical current text, `original_text` mirrors it after
/// every successful edit, and `file_name` links back to the owning document
/// (a weak, lookup-only relation). Everything else round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Canonical current text of the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Mirror of `content`, kept in sync on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,

    /// File name of the owning document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Arbitrary provenance fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChunkPayload {
    /// Build the replacement payload for an edit: caller-supplied fields plus
    /// the two synchronized text fields.
    pub fn for_text(text: impl Into<String>, extra: Map<String, Value>) -> Self {
        let text = text.into();
        let mut payload = Self {
            content: Some(text.clone()),
            original_text: Some(text),
            file_name: None,
            extra,
        };
        // A file_name passed through extra is a recognized field, not an
        // opaque one.
        if let Some(Value::String(name)) = payload.extra.remove("file_name") {
            payload.file_name = Some(name);
        }
        payload
    }

    /// The chunk's text: `content` if present, else `original_text`.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().or(self.original_text.as_deref())
    }

    /// Case-insensitive substring match against `content` or `original_text`.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.text()
            .map(|t| t.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// A point in the vector index: id, optional vector, payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Opaque stable id (UUID string in practice).
    pub id: String,

    /// Embedding of the chunk text. Absent when a read skips vectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,

    /// Text and provenance fields.
    #[serde(default)]
    pub payload: ChunkPayload,
}

impl Chunk {
    pub fn new(id: impl Into<String>, payload: ChunkPayload) -> Self {
        Self {
            id: id.into(),
            vector: None,
            payload,
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }
}

/// A chunk paired with a similarity score from nearest-neighbor search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Similarity in [0, 1], highest first.
    pub score: f32,
}

/// One search result: ephemeral, never persisted.
///
/// Lexical matches carry no score; vector matches carry the index's
/// similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub payload: ChunkPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl From<Chunk> for SearchHit {
    fn from(chunk: Chunk) -> Self {
        Self {
            id: chunk.id,
            payload: chunk.payload,
            score: None,
        }
    }
}

impl From<ScoredChunk> for SearchHit {
    fn from(scored: ScoredChunk) -> Self {
        Self {
            id: scored.chunk.id,
            payload: scored.chunk.payload,
            score: Some(scored.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_for_text_syncs_both_fields() {
        let payload = ChunkPayload::for_text("new text", Map::new());
        assert_eq!(payload.content.as_deref(), Some("new text"));
        assert_eq!(payload.original_text.as_deref(), Some("new text"));
        assert_eq!(payload.content, payload.original_text);
    }

    #[test]
    fn test_for_text_promotes_file_name() {
        let mut extra = Map::new();
        extra.insert("file_name".to_string(), json!("report.pdf"));
        extra.insert("page".to_string(), json!(3));

        let payload = ChunkPayload::for_text("text", extra);
        assert_eq!(payload.file_name.as_deref(), Some("report.pdf"));
        assert!(!payload.extra.contains_key("file_name"));
        assert_eq!(payload.extra.get("page"), Some(&json!(3)));
    }

    #[test]
    fn test_matches_case_insensitive() {
        let payload = ChunkPayload::for_text("The Database Schema", Map::new());
        assert!(payload.matches("database"));
        assert!(payload.matches("DATABASE"));
        assert!(payload.matches("base sch"));
        assert!(!payload.matches("network"));
    }

    #[test]
    fn test_matches_falls_back_to_original_text() {
        let payload = ChunkPayload {
            content: None,
            original_text: Some("legacy text".to_string()),
            ..Default::default()
        };
        assert!(payload.matches("legacy"));
    }

    #[test]
    fn test_matches_empty_payload() {
        let payload = ChunkPayload::default();
        assert!(!payload.matches("anything"));
    }

    #[test]
    fn test_extra_fields_roundtrip() {
        let raw = json!({
            "content": "body",
            "original_text": "body",
            "file_name": "a.txt",
            "chunk_index": 7,
            "source": "ingest-v2"
        });

        let payload: ChunkPayload = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(payload.extra.get("chunk_index"), Some(&json!(7)));
        assert_eq!(payload.extra.get("source"), Some(&json!("ingest-v2")));

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_search_hit_from_chunk_has_no_score() {
        let chunk = Chunk::new("c1", ChunkPayload::for_text("t", Map::new()));
        let hit = SearchHit::from(chunk);
        assert!(hit.score.is_none());
    }

    #[test]
    fn test_search_hit_from_scored_chunk() {
        let chunk = Chunk::new("c1", ChunkPayload::for_text("t", Map::new()));
        let hit = SearchHit::from(ScoredChunk { chunk, score: 0.87 });
        assert_eq!(hit.score, Some(0.87));
    }
}
