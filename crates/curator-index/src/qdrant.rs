//! Qdrant REST implementation of the vector index client.
//!
//! Speaks the point API of a Qdrant-style index: retrieve by id, vector
//! replace, payload overwrite (PUT, full replace), bounded scroll, and
//! similarity search. Writes pass `wait=true` so a success response means
//! the write is applied, which is what makes the coordinator's verification
//! read meaningful.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use curator_types::{Chunk, ChunkPayload, ScoredChunk};

use crate::client::{ScrollFilter, VectorIndexClient};
use crate::error::IndexError;

/// Request timeout for index calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Qdrant point ids are either unsigned integers or UUID strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PointId {
    Uint(u64),
    Str(String),
}

impl PointId {
    fn into_string(self) -> String {
        match self {
            PointId::Uint(n) => n.to_string(),
            PointId::Str(s) => s,
        }
    }
}

/// Encode an opaque string id the way the index expects it: numeric ids as
/// JSON numbers, everything else (UUIDs) as strings.
fn id_to_json(id: &str) -> Value {
    id.parse::<u64>().map(Value::from).unwrap_or_else(|_| json!(id))
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    id: PointId,
    #[serde(default)]
    payload: ChunkPayload,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

impl From<PointRecord> for Chunk {
    fn from(record: PointRecord) -> Self {
        Chunk {
            id: record.id.into_string(),
            vector: record.vector,
            payload: record.payload,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    result: Option<PointRecord>,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    points: Vec<PointRecord>,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: ChunkPayload,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    points_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfoResponse {
    result: CollectionInfo,
}

#[derive(Debug, Serialize)]
struct VectorWrite {
    id: Value,
    vector: Vec<f32>,
}

/// REST client for one collection of a Qdrant-style vector index.
pub struct QdrantIndex {
    client: Client,
    base_url: String,
    collection: String,
}

impl QdrantIndex {
    /// Create a client for `collection` at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        })
    }

    fn points_url(&self, suffix: &str) -> String {
        format!(
            "{}/collections/{}/points{}",
            self.base_url, self.collection, suffix
        )
    }

    /// Map non-success statuses to errors, keeping the index's own message.
    async fn check(response: Response) -> Result<Response, IndexError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(IndexError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VectorIndexClient for QdrantIndex {
    async fn retrieve(&self, id: &str) -> Result<Chunk, IndexError> {
        let url = self.points_url(&format!("/{}", id));
        debug!(id, "Retrieving point");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IndexError::NotFound(id.to_string()));
        }
        let response = Self::check(response).await?;

        let body: RetrieveResponse = response.json().await?;
        match body.result {
            Some(record) => Ok(record.into()),
            None => Err(IndexError::NotFound(id.to_string())),
        }
    }

    async fn replace_vector(&self, id: &str, vector: &[f32]) -> Result<(), IndexError> {
        let url = self.points_url("/vectors");
        debug!(id, dim = vector.len(), "Replacing vector");

        let body = json!({
            "points": [VectorWrite {
                id: id_to_json(id),
                vector: vector.to_vec(),
            }]
        });

        let response = self
            .client
            .put(&url)
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IndexError::NotFound(id.to_string()));
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn overwrite_payload(
        &self,
        id: &str,
        payload: &ChunkPayload,
    ) -> Result<(), IndexError> {
        let url = self.points_url("/payload");
        debug!(id, "Overwriting payload");

        // PUT on the payload endpoint replaces the whole payload; POST would
        // merge field-wise.
        let body = json!({
            "points": [id_to_json(id)],
            "payload": payload,
        });

        let response = self
            .client
            .put(&url)
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IndexError::NotFound(id.to_string()));
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn scroll(
        &self,
        limit: usize,
        filter: Option<ScrollFilter>,
    ) -> Result<Vec<Chunk>, IndexError> {
        let url = self.points_url("/scroll");
        debug!(limit, filtered = filter.is_some(), "Scrolling points");

        let mut body = json!({
            "limit": limit,
            "with_payload": true,
            "with_vector": false,
        });
        if let Some(filter) = filter {
            body["filter"] = json!({
                "must": [{ "key": filter.key, "match": { "value": filter.value } }]
            });
        }

        let response = self.client.post(&url).json(&body).send().await?;
        let response = Self::check(response).await?;

        let body: ScrollResponse = response.json().await?;
        Ok(body.result.points.into_iter().map(Chunk::from).collect())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        let url = self.points_url("/search");
        debug!(limit, dim = vector.len(), "Searching nearest neighbors");

        let body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let response = Self::check(response).await?;

        let body: SearchResponse = response.json().await?;
        Ok(body
            .result
            .into_iter()
            .map(|point| ScoredChunk {
                chunk: Chunk {
                    id: point.id.into_string(),
                    vector: None,
                    payload: point.payload,
                },
                score: point.score,
            })
            .collect())
    }

    async fn point_count(&self) -> Result<u64, IndexError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);

        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;

        let body: CollectionInfoResponse = response.json().await?;
        Ok(body.result.points_count.unwrap_or(0))
    }
}
