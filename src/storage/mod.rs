//! Storage Module
//!
//! This module provides the core storage functionality for rankkv: a
//! thread-safe store of typed values with per-key locking, TTL timers, and an
//! embedded sorted set type.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                               │
//! │  ┌──────────┐   ┌──────────────┐   ┌──────────────────────┐ │
//! │  │ KeyLocks │──>│ values table │──>│ Text | Counter |     │ │
//! │  │ per key  │   │  (sharded)   │   │ SortedSet            │ │
//! │  └──────────┘   └──────────────┘   └──────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │
//!              ┌─────────────┴─────────────┐
//!              │     ExpiryScheduler       │
//!              │  (one tokio task per TTL) │
//!              └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use rankkv::storage::{SortedSetItem, Store};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Store::new();
//!
//! store.set("name", "Ariz");
//! assert_eq!(store.get("name").unwrap(), Some("Ariz".to_string()));
//!
//! assert_eq!(store.incr("visits").unwrap(), 1);
//!
//! store.zadd("board", [SortedSetItem::new(2.0, "bob"), SortedSetItem::new(1.0, "amy")]).unwrap();
//! assert_eq!(store.zrank("board", "bob").unwrap(), Some(1));
//!
//! store.set_ex("session", "token123", Some(Duration::from_secs(3600)));
//! # }
//! ```

pub mod config;
pub mod expiry;
pub mod locks;
pub mod sorted_set;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use config::StoreConfig;
pub use expiry::{Expire, ExpiryScheduler, PendingExpiry};
pub use locks::{KeyGuard, KeyLocks};
pub use sorted_set::{SortedSet, SortedSetItem};
pub use store::{Store, StoreError, StoreStats};
pub use value::{Value, ValueKind};
