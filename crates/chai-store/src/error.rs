//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Domain error (chai_core::CoreError)     io::Error (snapshot open)     │
//! │       │                                        │                        │
//! │       └──────────────► StoreError ◄────────────┘                        │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                   Host application                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads never produce errors: absent keys and malformed blobs degrade to
//! empty values. `StoreError` appears on opening the snapshot and on
//! repository operations that surface a domain error.

use thiserror::Error;

use chai_core::CoreError;

/// Persistence-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be opened or created.
    ///
    /// A missing snapshot is NOT an error (fresh install starts empty);
    /// this covers real I/O failures like permissions or a full disk.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chai_core::types::OrderStatus;

    #[test]
    fn test_core_error_passes_through_transparently() {
        let err: StoreError = CoreError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Preparing,
        }
        .into();
        assert_eq!(err.to_string(), "illegal status transition Ready → Preparing");
    }
}
