//! Connection Handler Module
//!
//! This module manages individual client connections to rankkv.
//! Each client connection is handled by its own async task, and every task
//! shares the same store through its `CommandHandler`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TCP Listener                            │
//! │                    (main.rs)                                │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        │ accept()
//!                        ▼
//!           ┌────────────────────────┐
//!           │   For each client...   │
//!           └────────────┬───────────┘
//!                        │
//!                        │ spawn task
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ConnectionHandler                           │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │ Read bytes  │───>│ Split line  │───>│ Execute cmd │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      ┌─────────────┐        │
//! │                                      │ JSON reply  │        │
//! │                                      └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rankkv::commands::CommandHandler;
//! use rankkv::connection::{handle_connection, ConnectionStats};
//! use rankkv::storage::Store;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let store = Store::new();
//! let stats = Arc::new(ConnectionStats::new());
//! let listener = TcpListener::bind("127.0.0.1:6380").await?;
//!
//! loop {
//!     let (stream, addr) = listener.accept().await?;
//!     let handler = CommandHandler::new(store.clone());
//!     tokio::spawn(handle_connection(stream, addr, handler, Arc::clone(&stats)));
//! }
//! # }
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{handle_connection, ConnectionError, ConnectionHandler, ConnectionStats};
