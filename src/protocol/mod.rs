//! Text Protocol
//!
//! This module implements the text side of rankkv: the command grammar, the
//! JSON replies, and newline framing for the network transport.
//!
//! ## Modules
//!
//! - `command`: Parses a line into a [`Command`]
//! - `reply`: Defines [`Reply`] and its JSON encoding
//! - `frame`: Splits newline-terminated lines off a receive buffer
//!
//! ## Example
//!
//! ```
//! use rankkv::protocol::{parse_command, Command, Reply};
//!
//! let command = parse_command("GET name").unwrap();
//! assert_eq!(command, Command::Get { key: "name".to_string() });
//!
//! let reply = Reply::Text("Ariz".to_string());
//! assert_eq!(reply.to_json().unwrap(), "\"Ariz\"");
//! ```

pub mod command;
pub mod frame;
pub mod reply;

use thiserror::Error;

// Re-export commonly used types for convenience
pub use command::{parse_command, Command};
pub use frame::{parse_line, MAX_LINE_LENGTH};
pub use reply::{ErrorReply, Reply};

/// Errors that can occur while reading a command.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The input is empty
    #[error("empty input")]
    EmptyInput,

    /// The input matches no command in the grammar
    #[error("invalid command {0:?}")]
    UnknownCommand(String),

    /// A line is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// A line exceeds the maximum allowed size
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
