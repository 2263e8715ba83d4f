//! REST client for the document metadata service.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use curator_types::{Document, DocumentCounts, DocumentPage, DocumentPatch};

use crate::error::DocsError;

/// Request timeout for metadata calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default page size for document listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 15;

/// Client for the document metadata service.
pub struct DocumentStore {
    client: Client,
    base_url: String,
}

impl DocumentStore {
    /// Create a client for the metadata service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DocsError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: Response) -> Result<Response, DocsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(DocsError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// List documents, newest first, optionally filtered by a filename
    /// substring (matched store-side, case-insensitively).
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<DocumentPage, DocsError> {
        let url = format!("{}/documents", self.base_url);
        debug!(page, limit, search = search.unwrap_or(""), "Listing documents");

        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Apply a partial update to one document record.
    pub async fn update(&self, id: &str, patch: &DocumentPatch) -> Result<Document, DocsError> {
        let url = format!("{}/documents/{}", self.base_url, id);
        debug!(id, "Updating document");

        let response = self.client.put(&url).json(patch).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DocsError::NotFound(id.to_string()));
        }
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Mark a document as human-reviewed (or clear the flag).
    pub async fn set_fixed(&self, id: &str, fixed: bool) -> Result<Document, DocsError> {
        self.update(id, &DocumentPatch::set_fixed(fixed)).await
    }

    /// Aggregate counts for the stats view.
    pub async fn counts(&self) -> Result<DocumentCounts, DocsError> {
        let url = format!("{}/stats", self.base_url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
