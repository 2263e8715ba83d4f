//! # curator-index
//!
//! Typed operations against the external vector index service.
//!
//! The index is an id-addressed point store (id, vector, payload) reached
//! over REST. This crate defines the [`VectorIndexClient`] trait consumed by
//! the sync coordinator and the search service, and [`QdrantIndex`], the
//! production implementation speaking the Qdrant point API.
//!
//! All operations are single-shot network calls: transport failures
//! propagate as [`IndexError::Transport`] with no client-side retry.

pub mod client;
pub mod error;
pub mod qdrant;

pub use client::{ScrollFilter, VectorIndexClient};
pub use error::IndexError;
pub use qdrant::QdrantIndex;
