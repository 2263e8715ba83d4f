//! # curator-embeddings
//!
//! Local embedding generation for corpus-curator using Candle.
//!
//! Turns chunk text and search queries into fixed-dimension vectors for the
//! vector index, with no external inference API.
//!
//! ## Model contract
//! - BGE-family BERT encoder (bge-large-en-v1.5, 1024 dimensions)
//! - CLS-token pooling, normalized to unit length (`{pooling: "cls",
//!   normalize: true}`) — a fixed property of the model, not a tunable
//! - Deterministic for a fixed model revision: identical text yields
//!   identical vectors
//! - Automatic model file caching; works offline after the first download

pub mod cache;
pub mod candle;
pub mod error;
pub mod model;

pub use crate::candle::CandleEmbedder;
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES};
pub use error::EmbeddingError;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
