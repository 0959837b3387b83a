//! # chai-store: Persistence Layer for chai-pos
//!
//! Key-value persistence plus the repositories that give the host
//! application its API surface.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        chai-pos Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Application (mobile shell)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ chai-store (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │ orders  │ │ tokens  │ │ catalog │ │settings │ │ reports │ │   │
//! │  │   └────┬────┘ └────┬────┘ └────┬────┘ └────┬────┘ └────┬────┘ │   │
//! │  │        └───────────┴─────┬─────┴───────────┴───────────┘       │   │
//! │  │                   ┌──────▼──────┐                               │   │
//! │  │                   │    Store    │  in-memory mirror +           │   │
//! │  │                   │  (KV map)   │  background snapshot flush    │   │
//! │  │                   └─────────────┘                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  chai-core (pure logic)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use chai_store::Store;
//!
//! # fn main() -> Result<(), chai_store::StoreError> {
//! let store = Store::open("/var/lib/chai-pos")?;
//! store.catalog().seed_default_categories();
//! let settings = store.settings().get();
//! println!("welcome to {}", settings.shop_name);
//! store.sync();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod keys;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
pub use repository::report::Reports;
pub use repository::settings::SettingsRepository;
pub use repository::token::TokenAllocator;
pub use store::Store;
