//! # Token Allocator
//!
//! Queue token numbering for the kitchen board.
//!
//! ## Counter Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Grouped (current):   tokenCounter:<category>:<YYYY-MM-DD>              │
//! │                       one counter per category per day; a new day       │
//! │                       means a new key, so numbering restarts at 1       │
//! │                       with no reset job                                 │
//! │                                                                         │
//! │  Global (legacy):     tokenCounter                                      │
//! │                       single undated counter, never resets; kept for    │
//! │                       hosts still printing shop-wide tokens             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `next_*` increments and persists; `peek_*` answers "what would the next
//! token be" for the checkout preview without burning a number.

use chrono::NaiveDate;
use tracing::debug;

use crate::keys;
use crate::store::Store;

/// Allocates queue token numbers from the store's counter keys.
#[derive(Debug, Clone)]
pub struct TokenAllocator {
    store: Store,
}

impl TokenAllocator {
    pub(crate) fn new(store: Store) -> Self {
        TokenAllocator { store }
    }

    // -------------------------------------------------------------------------
    // Per-category, per-day counters
    // -------------------------------------------------------------------------

    /// Allocates the next token for `category` on `day`: reads the counter
    /// (absent ⇒ 0), adds one, persists, returns.
    pub fn next_for_category(&self, category: &str, day: NaiveDate) -> i64 {
        let key = keys::token_counter(category, day);
        let next = self.store.get_number(&key).unwrap_or(0) + 1;
        self.store.set_number(&key, next);
        debug!(category, %day, token = next, "Allocated token");
        next
    }

    /// Returns what [`Self::next_for_category`] would return, without
    /// consuming the number.
    pub fn peek_for_category(&self, category: &str, day: NaiveDate) -> i64 {
        let key = keys::token_counter(category, day);
        self.store.get_number(&key).unwrap_or(0) + 1
    }

    // -------------------------------------------------------------------------
    // Legacy global counter
    // -------------------------------------------------------------------------

    /// Allocates the next shop-wide token. This counter is not date-scoped
    /// and never resets.
    pub fn next_global(&self) -> i64 {
        let next = self.store.get_number(keys::TOKEN_COUNTER).unwrap_or(0) + 1;
        self.store.set_number(keys::TOKEN_COUNTER, next);
        debug!(token = next, "Allocated global token");
        next
    }

    /// Peeks the global counter without consuming a number.
    pub fn peek_global(&self) -> i64 {
        self.store.get_number(keys::TOKEN_COUNTER).unwrap_or(0) + 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
