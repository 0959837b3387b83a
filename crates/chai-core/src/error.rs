//! # Error Types
//!
//! Domain-specific error types for chai-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  chai-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Cart/input validation failures                 │
//! │                                                                         │
//! │  chai-store errors (separate crate)                                    │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → host application     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, statuses, etc.)
//! 3. Errors are enum variants, never String
//!
//! Note that most read paths deliberately do NOT error: an absent order is
//! `None`, a malformed stored blob is treated as empty, an empty report
//! window yields zeros. Errors are reserved for operations the caller must
//! not silently continue past.

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Order creation was attempted with an empty cart.
    ///
    /// ## When This Occurs
    /// The host UI normally disables checkout on an empty cart, but the
    /// engine rejects it too rather than persisting a zero-item order.
    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    /// Status update requested on a billing order.
    ///
    /// Billing orders carry no queue status; only token orders move through
    /// the preparing → ready → completed lifecycle.
    #[error("order {0} is a billing order and has no queue status")]
    NotATokenOrder(String),

    /// Status update that is not a legal forward transition.
    ///
    /// ## Legal Transitions
    /// ```text
    /// preparing ──► ready ──► completed
    /// ```
    /// Everything else (backward, skipping, leaving `completed`, staying in
    /// place) is rejected without touching the order log.
    #[error("illegal status transition {from:?} → {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Cart/input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A cart line has a non-positive quantity.
    #[error("line for product {product_id} has quantity {quantity}, must be >= 1")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// A cart line has a negative unit price.
    #[error("line for product {product_id} has a negative unit price")]
    NegativePrice { product_id: String },

    /// A cart line's tax rate is outside 0-100%.
    #[error("line for product {product_id} has tax rate {bps} bps, must be 0-10000")]
    TaxRateOutOfRange { product_id: String, bps: u32 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Preparing,
        };
        assert_eq!(err.to_string(), "illegal status transition Ready → Preparing");

        let err = CoreError::NotATokenOrder("order_1_abc".to_string());
        assert!(err.to_string().contains("order_1_abc"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::InvalidQuantity {
            product_id: "p1".to_string(),
            quantity: 0,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
