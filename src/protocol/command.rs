//! Command Grammar
//!
//! Parses one line of text into a [`Command`]. The grammar is closed: a line
//! either matches one of the patterns below exactly or is rejected.
//!
//! ## Grammar
//!
//! ```text
//! DBSIZE
//! GET <key>              DEL <key>
//! INCR <key>             ZCARD <key>
//! SET <key> <value>
//! SET <key> <value> EX <seconds>
//! ZADD <key> <score> <member>
//! ZRANK <key> <member>
//! ZRANGE <key> <start> <stop>
//! ```
//!
//! Keywords are case-sensitive and tokens are separated by single spaces.
//! `<key>`, `<value>` and `<member>` are `[A-Za-z0-9_-]+`, `<seconds>` is
//! `[0-9]+`, `<start>`/`<stop>` are integers with an optional leading `-`,
//! and `<score>` additionally allows a fractional part.
//!
//! The grammar knows nothing about how the store represents values; it only
//! produces `Command`s for the command handler to execute.

use crate::protocol::{ParseError, ParseResult};

/// A parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    DbSize,
    Get { key: String },
    Del { key: String },
    Incr { key: String },
    ZCard { key: String },
    Set { key: String, value: String },
    SetEx { key: String, value: String, seconds: u64 },
    ZAdd { key: String, score: f64, member: String },
    ZRank { key: String, member: String },
    ZRange { key: String, start: i64, stop: i64 },
}

impl Command {
    /// The command's keyword, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::DbSize => "DBSIZE",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Incr { .. } => "INCR",
            Command::ZCard { .. } => "ZCARD",
            Command::Set { .. } | Command::SetEx { .. } => "SET",
            Command::ZAdd { .. } => "ZADD",
            Command::ZRank { .. } => "ZRANK",
            Command::ZRange { .. } => "ZRANGE",
        }
    }
}

/// Parses a command line.
///
/// # Example
///
/// ```
/// use rankkv::protocol::{parse_command, Command};
///
/// let command = parse_command("SET foo bar EX 10").unwrap();
/// assert_eq!(
///     command,
///     Command::SetEx { key: "foo".into(), value: "bar".into(), seconds: 10 }
/// );
///
/// assert!(parse_command("SEY foo").is_err());
/// ```
pub fn parse_command(input: &str) -> ParseResult<Command> {
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let tokens: Vec<&str> = input.split(' ').collect();

    let command = match tokens.as_slice() {
        ["DBSIZE"] => Some(Command::DbSize),

        ["GET", key] if is_name(key) => Some(Command::Get { key: key.to_string() }),
        ["DEL", key] if is_name(key) => Some(Command::Del { key: key.to_string() }),
        ["INCR", key] if is_name(key) => Some(Command::Incr { key: key.to_string() }),
        ["ZCARD", key] if is_name(key) => Some(Command::ZCard { key: key.to_string() }),

        ["SET", key, value] if is_name(key) && is_name(value) => Some(Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        }),

        ["SET", key, value, "EX", seconds] if is_name(key) && is_name(value) => {
            parse_seconds(seconds).map(|seconds| Command::SetEx {
                key: key.to_string(),
                value: value.to_string(),
                seconds,
            })
        }

        ["ZADD", key, score, member] if is_name(key) && is_name(member) => {
            parse_score(score).map(|score| Command::ZAdd {
                key: key.to_string(),
                score,
                member: member.to_string(),
            })
        }

        ["ZRANK", key, member] if is_name(key) && is_name(member) => Some(Command::ZRank {
            key: key.to_string(),
            member: member.to_string(),
        }),

        ["ZRANGE", key, start, stop] if is_name(key) => parse_index(start)
            .zip(parse_index(stop))
            .map(|(start, stop)| Command::ZRange {
                key: key.to_string(),
                start,
                stop,
            }),

        _ => None,
    };

    command.ok_or_else(|| ParseError::UnknownCommand(input.to_string()))
}

/// `[A-Za-z0-9_-]+`
fn is_name(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// `[0-9]+`
fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_seconds(token: &str) -> Option<u64> {
    if !is_digits(token) {
        return None;
    }
    token.parse().ok()
}

/// `-?[0-9]+`
fn parse_index(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if !is_digits(digits) {
        return None;
    }
    token.parse().ok()
}

/// `-?[0-9]+(\.[0-9]+)?`
fn parse_score(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let valid = match unsigned.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(unsigned),
    };
    if !valid {
        return None;
    }
    token.parse().ok()
}
