//! # Settings Repository
//!
//! One JSON blob under the `settings` key. Absent or unreadable settings
//! fall back to defaults; blobs written by older app versions backfill
//! missing fields through the serde defaults on [`Settings`].

use tracing::debug;

use chai_core::types::Settings;

use crate::keys;
use crate::store::Store;

/// Repository over the shop settings blob.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub(crate) fn new(store: Store) -> Self {
        SettingsRepository { store }
    }

    /// Current settings, defaults when nothing (readable) is stored.
    pub fn get(&self) -> Settings {
        self.store.get_object(keys::SETTINGS).unwrap_or_default()
    }

    /// Replaces the stored settings.
    pub fn update(&self, settings: &Settings) {
        self.store.set_object(keys::SETTINGS, settings);
        debug!(shop = %settings.shop_name, "Settings updated");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
