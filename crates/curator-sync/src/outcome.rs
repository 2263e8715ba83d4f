//! Edit outcome vocabulary.
//!
//! Callers branch on these tags; they are the contract of the edit
//! operation, not an internal detail.

use serde::Serialize;
use thiserror::Error;

use curator_index::IndexError;

/// Result of a completed edit. Every variant means the payload write
/// succeeded; they differ in what is known about the vector and the
/// verification read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Vector and payload written, verification read matched.
    Success,

    /// Payload written but the embedding (or its write) failed; the stored
    /// vector still reflects the previous text.
    PartialSuccess { vector_stale: bool },

    /// Verification read returned a payload that differs from what was
    /// written. The write is trusted over the read (index read-lag);
    /// treated as success but logged as a consistency warning.
    VerificationMismatch,

    /// Verification read failed after both writes reported success. The
    /// edit is likely applied but cannot be confirmed.
    VerificationInconclusive,
}

impl SyncOutcome {
    /// True for every variant: the payload write went through.
    pub fn is_applied(&self) -> bool {
        true
    }

    /// Whether the stored vector is known to be stale.
    pub fn vector_stale(&self) -> bool {
        matches!(self, SyncOutcome::PartialSuccess { vector_stale: true })
    }
}

/// Hard failure of an edit. Only the payload overwrite (and input
/// validation before any I/O) can produce one; earlier stages degrade to
/// [`SyncOutcome::PartialSuccess`] instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Empty edit text is rejected before any write: a degenerate embedding
    /// would poison nearest-neighbor results.
    #[error("Edit text must not be empty")]
    EmptyText,

    /// The payload overwrite itself failed; the edit is lost.
    #[error("Payload overwrite failed: {cause}")]
    PayloadWrite {
        #[source]
        cause: IndexError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_stale_flag() {
        assert!(!SyncOutcome::Success.vector_stale());
        assert!(SyncOutcome::PartialSuccess { vector_stale: true }.vector_stale());
        assert!(!SyncOutcome::VerificationMismatch.vector_stale());
    }

    #[test]
    fn test_outcome_serialization_tags() {
        let json = serde_json::to_value(SyncOutcome::PartialSuccess { vector_stale: true }).unwrap();
        assert_eq!(json["outcome"], "partial_success");
        assert_eq!(json["vector_stale"], true);

        let json = serde_json::to_value(SyncOutcome::Success).unwrap();
        assert_eq!(json["outcome"], "success");
    }

    #[test]
    fn test_payload_write_error_keeps_cause() {
        let err = SyncError::PayloadWrite {
            cause: IndexError::NotFound("missing-id".to_string()),
        };
        assert!(err.to_string().contains("missing-id"));
    }
}
