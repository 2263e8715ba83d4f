//! # curator-docs
//!
//! Typed operations against the external document metadata store.
//!
//! The metadata store keeps document records (file name, status, the
//! human-review `fixed` flag) independently of the vector index. This crate
//! is integration glue: paged/filtered listing, single-record update, and
//! the aggregate counts shown by `stats`. The sync core never writes here.

pub mod error;
pub mod store;

pub use error::DocsError;
pub use store::DocumentStore;
