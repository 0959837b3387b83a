//! # Key-Value Store
//!
//! The durable string-keyed map every repository sits on.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Data Flow                                    │
//! │                                                                         │
//! │  Repository call (synchronous)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐     set/remove      ┌──────────────────┐ │
//! │  │   In-memory mirror       │ ──────────────────► │  Flush thread    │ │
//! │  │   HashMap<String,String> │   (channel, fire-   │  coalesces ops,  │ │
//! │  │   behind a Mutex         │    and-forget)      │  rewrites the    │ │
//! │  └──────────────────────────┘                     │  snapshot file   │ │
//! │       ▲                                           └────────┬─────────┘ │
//! │       │ reads never touch disk                             │           │
//! │       │                                                    ▼           │
//! │  Store::open() loads the snapshot once            <dir>/chai-pos.json  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Durability Model
//! Writes return as soon as the mirror is updated; the snapshot write
//! happens on the flush thread. A crash between the two loses the most
//! recent writes - an accepted tradeoff for a single-device POS that must
//! never block the register on disk I/O. Call [`Store::sync`] on shutdown
//! to drain the queue.
//!
//! ## Read-Modify-Write Hazard
//! Collections (the order log, the catalog) are stored whole under one key.
//! Callers that read, mutate and write back must not interleave with another
//! writer to the same key. Inside one process the repositories run their
//! mutations synchronously, so no interleaving is possible; sharing one
//! snapshot between processes is NOT supported.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::repository::catalog::CatalogRepository;
use crate::repository::order::OrderRepository;
use crate::repository::report::Reports;
use crate::repository::settings::SettingsRepository;
use crate::repository::token::TokenAllocator;

/// Snapshot file name inside the store directory.
const SNAPSHOT_FILE: &str = "chai-pos.json";

// =============================================================================
// Flush Protocol
// =============================================================================

enum FlushOp {
    Set(String, String),
    Remove(String),
    /// Barrier: ack once everything sent before it is on disk.
    Sync(Sender<()>),
}

// =============================================================================
// Store
// =============================================================================

/// Cloneable handle to the key-value store.
///
/// ## Design: Explicit Handle, No Globals
/// The original app kept a module-level cache mirroring durable storage.
/// Here the handle is constructed once and passed into each repository, so
/// tests get isolated instances (`Store::in_memory()`) without shared
/// mutable state.
#[derive(Debug, Clone)]
pub struct Store {
    /// In-memory mirror; the source of truth for every read.
    cache: Arc<Mutex<HashMap<String, String>>>,
    /// Channel to the flush thread; `None` for purely in-memory stores.
    flush: Option<Sender<FlushOp>>,
}

impl Store {
    /// Opens a file-backed store rooted at `dir`.
    ///
    /// ## What This Does
    /// 1. Creates `dir` if missing
    /// 2. Loads the snapshot into the mirror (absent or malformed ⇒ empty)
    /// 3. Spawns the flush thread
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(SNAPSHOT_FILE);

        let map = load_snapshot(&path)?;
        info!(path = %path.display(), entries = map.len(), "Opened store");

        let (tx, rx) = mpsc::channel();
        let flusher_map = map.clone();
        thread::Builder::new()
            .name("chai-store-flush".to_string())
            .spawn(move || run_flusher(path, flusher_map, rx))?;

        Ok(Store {
            cache: Arc::new(Mutex::new(map)),
            flush: Some(tx),
        })
    }

    /// Creates a store with no durable backend (for tests and previews).
    pub fn in_memory() -> Self {
        Store {
            cache: Arc::new(Mutex::new(HashMap::new())),
            flush: None,
        }
    }

    // -------------------------------------------------------------------------
    // Raw access
    // -------------------------------------------------------------------------

    fn get_raw(&self, key: &str) -> Option<String> {
        self.cache
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set_raw(&self, key: &str, value: String) {
        self.cache
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.clone());
        if let Some(tx) = &self.flush {
            // Fire-and-forget: a dead flusher only costs durability,
            // never availability.
            let _ = tx.send(FlushOp::Set(key.to_string(), value));
        }
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    /// Reads a raw string value.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_raw(key)
    }

    /// Writes a raw string value.
    pub fn set_string(&self, key: &str, value: &str) {
        self.set_raw(key, value.to_string());
    }

    /// Reads an integer counter. Absent or unparseable ⇒ `None`.
    pub fn get_number(&self, key: &str) -> Option<i64> {
        self.get_raw(key)?.parse().ok()
    }

    /// Writes an integer counter.
    pub fn set_number(&self, key: &str, value: i64) {
        self.set_raw(key, value.to_string());
    }

    /// Reads a JSON object. Absent or malformed ⇒ `None`.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Malformed stored object, treating as absent");
                None
            }
        }
    }

    /// Writes a JSON object.
    pub fn set_object<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw),
            Err(e) => warn!(key, error = %e, "Failed to serialize object, write dropped"),
        }
    }

    /// Reads a JSON array. Absent or malformed ⇒ empty vec.
    pub fn get_array<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.get_raw(key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Malformed stored array, treating as empty");
                Vec::new()
            }
        }
    }

    /// Writes a JSON array.
    pub fn set_array<T: Serialize>(&self, key: &str, value: &[T]) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw),
            Err(e) => warn!(key, error = %e, "Failed to serialize array, write dropped"),
        }
    }

    /// Removes a key.
    pub fn remove(&self, key: &str) {
        self.cache
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        if let Some(tx) = &self.flush {
            let _ = tx.send(FlushOp::Remove(key.to_string()));
        }
    }

    /// Checks whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.cache
            .lock()
            .expect("store mutex poisoned")
            .contains_key(key)
    }

    /// Blocks until the flush thread has drained every write queued so far
    /// and attempted a snapshot write.
    ///
    /// ## When To Call
    /// On application shutdown, or in tests that reopen the store. Normal
    /// operation never waits on durability.
    ///
    /// ## Failed Writes
    /// The barrier acks even when the snapshot write failed, so a clean
    /// return is not a hard durability guarantee. The failure is logged and
    /// the flusher retries on the next operation (including another
    /// `sync()`), so a shutdown path that must be sure can check the logs
    /// and sync again.
    pub fn sync(&self) {
        if let Some(tx) = &self.flush {
            let (ack_tx, ack_rx) = mpsc::channel();
            if tx.send(FlushOp::Sync(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Repositories
    // -------------------------------------------------------------------------

    /// Returns the order repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let order = store.orders().create_order(&lines, "u1", None, &opts)?;
    /// ```
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.clone())
    }

    /// Returns the token allocator.
    pub fn tokens(&self) -> TokenAllocator {
        TokenAllocator::new(self.clone())
    }

    /// Returns the catalog repository.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.clone())
    }

    /// Returns the settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.clone())
    }

    /// Returns the report engine.
    pub fn reports(&self) -> Reports {
        Reports::new(self.clone())
    }
}

// =============================================================================
// Snapshot I/O
// =============================================================================

/// Loads the snapshot file. Missing file ⇒ empty map (fresh install);
/// malformed JSON ⇒ empty map with a warning (availability over strictness);
/// other I/O failures propagate.
fn load_snapshot(path: &Path) -> io::Result<HashMap<String, String>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e),
    };
    match serde_json::from_str(&raw) {
        Ok(map) => Ok(map),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed snapshot, starting empty");
            Ok(HashMap::new())
        }
    }
}

/// Writes the snapshot atomically: temp file in the same directory, then
/// rename over the old snapshot.
fn write_snapshot(path: &Path, map: &HashMap<String, String>) -> io::Result<()> {
    let raw = serde_json::to_string(map)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp: PathBuf = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)
}

/// Flush thread body: applies ops to its own copy of the map, coalescing
/// bursts into one snapshot write. Exits when every `Store` clone is gone.
fn run_flusher(path: PathBuf, mut map: HashMap<String, String>, rx: Receiver<FlushOp>) {
    // Stays set across iterations when a snapshot write fails, so the next
    // op (including a bare sync barrier) retries the write.
    let mut dirty = false;
    while let Ok(op) = rx.recv() {
        let mut acks = Vec::new();
        dirty |= apply_op(&mut map, op, &mut acks);
        // Drain whatever has piled up so a burst of writes costs one
        // snapshot rewrite.
        while let Ok(op) = rx.try_recv() {
            dirty |= apply_op(&mut map, op, &mut acks);
        }
        if dirty {
            match write_snapshot(&path, &map) {
                Ok(()) => {
                    dirty = false;
                    debug!(entries = map.len(), "Snapshot written");
                }
                Err(e) => warn!(error = %e, "Snapshot write failed, will retry"),
            }
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
    debug!("Flush thread exiting");
}

fn apply_op(
    map: &mut HashMap<String, String>,
    op: FlushOp,
    acks: &mut Vec<Sender<()>>,
) -> bool {
    match op {
        FlushOp::Set(key, value) => {
            map.insert(key, value);
            true
        }
        FlushOp::Remove(key) => {
            map.remove(&key);
            true
        }
        FlushOp::Sync(ack) => {
            acks.push(ack);
            false
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
