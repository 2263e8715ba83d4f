//! Document records held by the metadata store.
//!
//! Documents are consumed, not owned, by this subsystem: the sync and search
//! core only needs `file_name` (the weak relation to chunks), `status`, and
//! the human-review `fixed` flag. Remaining fields pass through opaquely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processing status of a document.
///
/// The store treats status as free text; the three well-known values get
/// variants and anything else is carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Ready,
    Other(String),
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "uploaded" => Self::Uploaded,
            "processing" => Self::Processing,
            "ready" => Self::Ready,
            _ => Self::Other(s),
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Uploaded => "uploaded".to_string(),
            DocumentStatus::Processing => "processing".to_string(),
            DocumentStatus::Ready => "ready".to_string(),
            DocumentStatus::Other(s) => s,
        }
    }
}

/// A document record from the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque id assigned by the metadata store.
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// File name; chunks reference their document through this value.
    pub file_name: String,

    #[serde(default = "default_status")]
    pub status: DocumentStatus,

    /// True once a human has reviewed and corrected this document's chunks.
    #[serde(default)]
    pub fixed: bool,

    /// Fields the core does not interpret (category, extension, size, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Uploaded
}

/// Partial update for a single document record.
///
/// Only set fields are sent; the store applies them field-wise.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
}

impl DocumentPatch {
    /// Patch that flips the human-review flag.
    pub fn set_fixed(fixed: bool) -> Self {
        Self {
            fixed: Some(fixed),
            ..Default::default()
        }
    }
}

/// Pagination envelope returned by the metadata store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// One page of document records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    #[serde(rename = "data")]
    pub documents: Vec<Document>,
    pub pagination: Pagination,
}

/// Aggregate counts reported by the metadata store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCounts {
    pub documents: u64,
    pub ready: u64,
    pub fixed: u64,
    pub not_fixed: u64,
}
