//! # rankkv - An In-Process Key-Value Store with Sorted Sets
//!
//! rankkv is a concurrent, in-memory key-value store written in Rust. Keys
//! hold text, integer counters, or score-ordered sorted sets, and any key can
//! be given a time-to-live.
//!
//! ## Features
//!
//! - **Per-Key Locking**: Operations on different keys never block each other
//! - **Typed Values**: Text, counters and sorted sets with checked access
//! - **TTL Support**: Every key with a TTL owns a cancellable timer
//! - **Sorted Sets**: Rank and range queries over members ordered by score
//! - **Text Commands**: A small command grammar served over TCP and a console
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              rankkv                                     │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │<───┐             │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │    │             │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘ ┌──┴────────┐    │
//! │                                               │        │  Console  │    │
//! │                                               ▼        └───────────┘    │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐    │
//! │  │  Command    │    │                   Store                      │    │
//! │  │  Grammar    │    │  ┌──────────┐  ┌──────────────────────────┐  │    │
//! │  │  + JSON     │    │  │ KeyLocks │─>│ values: Text | Counter | │  │    │
//! │  │  Replies    │    │  │          │  │         SortedSet        │  │    │
//! │  └─────────────┘    │  └──────────┘  └──────────────────────────┘  │    │
//! │                     └──────────────────────────────────────────────┘    │
//! │                                               ▲                         │
//! │                                               │                         │
//! │                     ┌─────────────────────────┴───────────────────────┐ │
//! │                     │           ExpiryScheduler                       │ │
//! │                     │      (one Tokio timer per TTL key)              │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use rankkv::{CommandHandler, Reply, Store};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Store::new();
//! let handler = CommandHandler::new(store.clone());
//!
//! assert_eq!(handler.execute("ZADD board 10 amy").unwrap(), Reply::Integer(1));
//! assert_eq!(handler.execute("ZADD board 5 bob").unwrap(), Reply::Integer(1));
//! assert_eq!(
//!     handler.execute("ZRANGE board -2 -1").unwrap(),
//!     Reply::Array(vec!["bob".to_string(), "amy".to_string()])
//! );
//!
//! // The same data is visible through the library API
//! assert_eq!(store.zrank("board", "amy").unwrap(), Some(1));
//! # }
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value [EX seconds]`
//! - `GET key`
//! - `DEL key`
//! - `INCR key`
//! - `DBSIZE`
//! - `ZADD key score member`
//! - `ZCARD key`
//! - `ZRANK key member`
//! - `ZRANGE key start stop`
//!
//! ## Module Overview
//!
//! - [`storage`]: The store, lock registry, TTL timers and sorted sets
//! - [`protocol`]: Command grammar, line framing and JSON replies
//! - [`commands`]: Maps commands onto store operations
//! - [`connection`]: Client connection management
//! - [`console`]: Interactive shell
//!
//! ## Design Highlights
//!
//! ### Per-Key Locks
//!
//! Every operation holds its key's lock for its whole critical section.
//! Locks live in a registry and are dropped once nobody holds or waits on
//! them, so the registry only ever contains keys in use.
//!
//! ### Timer Expiry with Generations
//!
//! Each TTL key owns one timer task. Rewriting a key cancels its timer, and
//! every entry carries a generation number, so a timer that fires late for a
//! replaced value leaves the new value alone.

pub mod commands;
pub mod connection;
pub mod console;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandError, CommandHandler};
pub use connection::{handle_connection, ConnectionStats};
pub use console::run_console;
pub use protocol::{parse_command, Command, ErrorReply, ParseError, Reply};
pub use storage::{SortedSet, SortedSetItem, Store, StoreConfig, StoreError, Value, ValueKind};

/// The default port rankkv listens on
pub const DEFAULT_PORT: u16 = 6380;

/// The default host rankkv binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of rankkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
