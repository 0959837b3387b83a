//! # Repository Layer
//!
//! One repository per aggregate, all layered over the same [`crate::Store`]
//! handle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Layout                                  │
//! │                                                                         │
//! │  OrderRepository ──── order log ("orders")                              │
//! │  TokenAllocator ───── counter family ("tokenCounter[:cat:day]")         │
//! │  CatalogRepository ── "products", "categories"                          │
//! │  SettingsRepository ─ "settings"                                        │
//! │  Reports ──────────── reads the order log, delegates to chai-core       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are cheap to construct (they hold a `Store` clone) and are
//! handed out by the accessor methods on [`crate::Store`].

pub mod catalog;
pub mod order;
pub mod report;
pub mod settings;
pub mod token;
