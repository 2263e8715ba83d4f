//! # curator-search
//!
//! The two retrieval modes over the chunk index.
//!
//! - **Lexical**: bounded scan of the index, case-insensitive substring
//!   filter over the text fields, scan order preserved, no score.
//! - **Vector**: embed the query, nearest-neighbor search, similarity
//!   scores in non-increasing order.
//!
//! Failures never fall back between modes: a failed vector search is an
//! error, not a lexical search.

pub mod error;
pub mod service;

pub use error::SearchError;
pub use service::{SearchMode, SearchService, DEFAULT_LIMIT, DOCUMENT_SCAN_LIMIT};
