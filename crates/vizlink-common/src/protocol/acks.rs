//! Batch acknowledgement types.
//!
//! The server answers every combined request with exactly one
//! acknowledgement frame.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by the server for one combined request.
///
/// # Fields
///
/// - `id`: the batch identifier this acknowledgement corresponds to
/// - `accepted`: how many calls the server applied
/// - `error`: error message (present when the batch was rejected)
///
/// # Example
///
/// ```
/// use vizlink_common::protocol::acks::BatchAck;
///
/// let ok = BatchAck::accepted(42, 256);
/// assert!(ok.error.is_none());
///
/// let rejected = BatchAck::rejected(42, "unknown method");
/// assert_eq!(rejected.accepted, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchAck {
    /// Batch identifier this acknowledgement corresponds to
    pub id: u64,
    /// Number of calls the server applied
    pub accepted: usize,
    /// Error message (present when the batch was rejected)
    pub error: Option<String>,
}

impl BatchAck {
    /// Creates an acknowledgement for a fully applied batch.
    pub fn accepted(id: u64, accepted: usize) -> Self {
        BatchAck {
            id,
            accepted,
            error: None,
        }
    }

    /// Creates an acknowledgement for a rejected batch.
    pub fn rejected(id: u64, error: impl Into<String>) -> Self {
        BatchAck {
            id,
            accepted: 0,
            error: Some(error.into()),
        }
    }
}
