//! # Order Status Machine
//!
//! Transition rules for the token-order lifecycle.
//!
//! ```text
//! ┌───────────┐      ┌───────┐      ┌───────────┐
//! │ preparing │ ───► │ ready │ ───► │ completed │ (terminal)
//! └───────────┘      └───────┘      └───────────┘
//! ```
//!
//! The original app accepted any status write and trusted the UI to only
//! offer the legal next step. Here the machine itself rejects backward,
//! skipped and self transitions with a typed error, so an out-of-date host
//! cannot corrupt the queue.

use crate::error::{CoreError, CoreResult};
use crate::types::OrderStatus;

impl OrderStatus {
    /// The single legal next step, `None` from the terminal state.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Whether moving to `to` is a legal forward transition.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        self.next() == Some(to)
    }
}

/// Validates a transition, returning the new status or a typed error.
///
/// ## Example
/// ```rust
/// use chai_core::status::advance;
/// use chai_core::types::OrderStatus;
///
/// assert!(advance(OrderStatus::Preparing, OrderStatus::Ready).is_ok());
/// assert!(advance(OrderStatus::Ready, OrderStatus::Preparing).is_err());
/// ```
pub fn advance(from: OrderStatus, to: OrderStatus) -> CoreResult<OrderStatus> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
