//! Command Handler
//!
//! Maps parsed [`Command`]s onto [`Store`] calls and turns the results into
//! [`Reply`]s. This is the only place that knows both the grammar and the
//! store's API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   parse()   │───>│  dispatch() │───>│   Reply     │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                            │                                │
//! │                            ▼                                │
//! │                          Store                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{parse_command, Command, ParseError, Reply};
use crate::storage::{SortedSetItem, Store, StoreError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors produced while handling a command line.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    /// The line did not match the grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Executes command lines against a shared store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: Store,
}

impl CommandHandler {
    /// Creates a new command handler over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Parses and executes one command line.
    ///
    /// # Returns
    ///
    /// The reply to send back, or the parse or store error.
    pub fn execute(&self, line: &str) -> Result<Reply, CommandError> {
        let command = parse_command(line)?;
        Ok(self.dispatch(command)?)
    }

    /// Executes an already parsed command.
    pub fn dispatch(&self, command: Command) -> Result<Reply, StoreError> {
        debug!(command = command.name(), "Executing command");

        let reply = match command {
            Command::DbSize => Reply::integer(self.store.db_size()),

            Command::Get { key } => Reply::from(self.store.get(&key)?),

            Command::Del { key } => Reply::integer(self.store.del(&[key])),

            Command::Incr { key } => Reply::Integer(self.store.incr(&key)?),

            Command::ZCard { key } => Reply::integer(self.store.zcard(&key)?),

            Command::Set { key, value } => {
                self.store.set(&key, value);
                Reply::ok()
            }

            Command::SetEx {
                key,
                value,
                seconds,
            } => {
                self.store
                    .set_ex(&key, value, Some(Duration::from_secs(seconds)));
                Reply::ok()
            }

            Command::ZAdd { key, score, member } => {
                let added = self
                    .store
                    .zadd(&key, [SortedSetItem::new(score, member)])?;
                Reply::integer(added)
            }

            Command::ZRank { key, member } => match self.store.zrank(&key, &member)? {
                Some(rank) => Reply::integer(rank),
                None => Reply::Nil,
            },

            Command::ZRange { key, start, stop } => {
                let members = self
                    .store
                    .zrange(&key, start, stop)?
                    .into_iter()
                    .map(|item| item.member)
                    .collect();
                Reply::Array(members)
            }
        };

        Ok(reply)
    }
}
