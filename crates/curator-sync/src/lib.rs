//! # curator-sync
//!
//! Chunk synchronization: the orchestration that keeps a chunk's stored
//! text, its regenerated embedding, and its index payload mutually
//! consistent after an edit.
//!
//! One public operation, [`ChunkSyncCoordinator::edit_chunk`], drives the
//! embedding generator and the vector index in a fixed order and returns a
//! single [`SyncOutcome`] or a [`SyncError`]. The ranking rule: losing a
//! user's text edit is worse than serving a temporarily stale vector, so
//! embedding failures degrade the outcome while payload-write failures
//! abort it.

pub mod coordinator;
pub mod outcome;

pub use coordinator::ChunkSyncCoordinator;
pub use outcome::{SyncError, SyncOutcome};
