//! # chai-core: Pure Business Logic for chai-pos
//!
//! This crate is the **heart** of chai-pos, a point-of-sale engine for a
//! small tea & juice shop. It contains all business logic as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        chai-pos Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Application (mobile shell)                 │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout UI ──► Token Board       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    chai-store (repositories)                    │   │
//! │  │    create_order, next_for_category, update_status, reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ chai-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  report   │  │   │
//! │  │   │   Order   │  │   Money   │  │  totals   │  │ aggregate │  │   │
//! │  │   │ OrderItem │  │  TaxRate  │  │ compliment│  │    CSV    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderItem, Settings, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Order totals, compliment zeroing, item expansion
//! - [`status`] - The token-order status state machine
//! - [`report`] - Sales report aggregation and CSV projection
//! - [`validation`] - Cart validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Storage, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use chai_core::Money` instead of
// `use chai_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{ReportKind, SalesReport, TopProduct};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category assigned to a token item whose product cannot be resolved
/// through the catalog.
///
/// ## Why a constant?
/// Falling back to "Other" is a deliberate default policy, not an error path.
/// The catalog seeds an "Other" category for exactly this purpose, so an
/// unresolvable product still lands on a real kitchen station.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Maximum number of entries in a sales report's product ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 10;
