//! # Storage Keys
//!
//! Every key the engine uses in the key-value store, in one place.
//!
//! Collection keys are fixed strings; the token counter keys form a family
//! derived from `(category, day)` so counters roll over naturally when the
//! date embedded in the key changes.

use chrono::NaiveDate;

/// The full order log: a JSON array of `Order`.
pub const ORDERS: &str = "orders";

/// The product catalog: a JSON array of `Product`.
pub const PRODUCTS: &str = "products";

/// The category list: a JSON array of `Category`.
pub const CATEGORIES: &str = "categories";

/// Shop settings blob.
pub const SETTINGS: &str = "settings";

/// Legacy global token counter. Not date-scoped: this counter never resets.
pub const TOKEN_COUNTER: &str = "tokenCounter";

/// Replaces every character outside `[A-Za-z0-9]` with `_` so a category
/// name is safe to embed in a storage key.
pub fn sanitize_category(category: &str) -> String {
    category
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Key for the `(category, day)` token counter.
///
/// First read of a new day finds nothing under the new key, so numbering
/// restarts at 1 without any explicit reset.
pub fn token_counter(category: &str, day: NaiveDate) -> String {
    format!(
        "{}:{}:{}",
        TOKEN_COUNTER,
        sanitize_category(category),
        day.format("%Y-%m-%d")
    )
}
