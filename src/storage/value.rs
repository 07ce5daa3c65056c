//! Stored Value Types
//!
//! A key holds exactly one of three kinds of value. Every store operation
//! matches on the variant and reports a type mismatch for kinds it does not
//! support.

use crate::storage::sorted_set::SortedSet;
use std::fmt;

/// A value stored under a key.
#[derive(Debug, Clone)]
pub enum Value {
    /// Plain text (what `SET` stores)
    Text(String),
    /// A 64-bit counter (what `INCR` stores)
    Counter(i64),
    /// An ordered collection of scored members
    SortedSet(SortedSet),
}

impl Value {
    /// Returns which variant this value is.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Counter(_) => ValueKind::Counter,
            Value::SortedSet(_) => ValueKind::SortedSet,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Counter(n)
    }
}

impl From<SortedSet> for Value {
    fn from(set: SortedSet) -> Self {
        Value::SortedSet(set)
    }
}

/// The variant tag of a [`Value`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Counter,
    SortedSet,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Counter => "counter",
            ValueKind::SortedSet => "sorted set",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
