//! Command Replies
//!
//! Every executed command produces a [`Reply`], which is sent to clients as a
//! single JSON value. Failures are sent as `{"error": "<message>"}`.
//!
//! ## Examples
//!
//! ```text
//! SET foo bar        -> true
//! GET foo            -> "bar"
//! GET missing        -> null
//! INCR hits          -> 1
//! ZRANGE board 0 9   -> ["one","two"]
//! SEY foo            -> {"error":"invalid command \"SEY foo\""}
//! ```

use serde::Serialize;
use std::fmt;

/// The result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Acknowledgement (`SET`)
    Bool(bool),
    /// Counts, counters and ranks
    Integer(i64),
    /// A text value (`GET`)
    Text(String),
    /// A list of member names (`ZRANGE`)
    Array(Vec<String>),
    /// Nothing found
    Nil,
}

impl Reply {
    /// Creates an acknowledgement reply.
    pub fn ok() -> Self {
        Reply::Bool(true)
    }

    pub fn integer(n: impl TryInto<i64>) -> Self {
        Reply::Integer(n.try_into().unwrap_or(i64::MAX))
    }

    /// Encodes the reply as a JSON value.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Option<String>> for Reply {
    fn from(value: Option<String>) -> Self {
        value.map_or(Reply::Nil, Reply::Text)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// The JSON body sent for a failed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }

    /// Encodes the error as `{"error": "<message>"}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
