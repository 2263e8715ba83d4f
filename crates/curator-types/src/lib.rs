//! # curator-types
//!
//! Shared domain types for corpus-curator.
//!
//! Defines the chunk and document records exchanged with the two external
//! stores (the vector index and the metadata service), the search result
//! types, and the layered application configuration.

pub mod chunk;
pub mod config;
pub mod document;
pub mod error;

pub use chunk::{Chunk, ChunkPayload, ScoredChunk, SearchHit};
pub use config::Settings;
pub use document::{
    Document, DocumentCounts, DocumentPage, DocumentPatch, DocumentStatus, Pagination,
};
pub use error::CuratorError;
