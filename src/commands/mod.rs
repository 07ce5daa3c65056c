//! Command Handler Module
//!
//! This module implements the command processing layer for rankkv.
//! It receives command lines, executes them against the store, and returns
//! replies.
//!
//! ## Architecture
//!
//! ```text
//! Command line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ Command Grammar │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value [EX seconds]`, `GET key`, `DEL key`, `INCR key`
//! - `ZADD key score member`, `ZCARD key`, `ZRANK key member`,
//!   `ZRANGE key start stop`
//! - `DBSIZE`

pub mod handler;

// Re-export the main command handler
pub use handler::{CommandError, CommandHandler};
