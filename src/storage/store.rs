//! Concurrent Key-Value Store
//!
//! This module implements the core store for rankkv: a table of typed values
//! (text, counters and sorted sets), a per-key lock registry, and TTL timers.
//!
//! ## Design Decisions
//!
//! 1. **Per-Key Locks**: Every operation, read or write, holds its key's lock
//!    for the whole critical section. Operations on different keys never wait
//!    on each other.
//! 2. **Sharded Table**: The value table is a sharded concurrent map. Its
//!    shard locks are only held for a single map access, never across a key's
//!    critical section.
//! 3. **Timer Expiry**: A key with a TTL owns one tokio timer task. Rewriting
//!    the key cancels it, and a generation check makes a late timer harmless.
//! 4. **Closed Value Type**: Values are an enum. Operations on the wrong
//!    variant fail with [`StoreError::TypeMismatch`] and change nothing.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │  ┌─────────────────┐   ┌──────────────────────────────────┐ │
//! │  │    KeyLocks     │   │        values (DashMap)          │ │
//! │  │ "a" -> Mutex    │──>│ "a" -> Entry { value, gen, ttl } │ │
//! │  │ "b" -> Mutex    │   │ "b" -> Entry { value, gen, ttl } │ │
//! │  └─────────────────┘   └──────────────────────────────────┘ │
//! │            ▲                           ▲                    │
//! │            └──────── ExpiryScheduler ──┘                    │
//! │                   (tokio timer tasks)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lock order is always key lock first, then a table shard. Nothing takes a
//! key lock while holding a table shard.

use crate::storage::config::StoreConfig;
use crate::storage::expiry::{Expire, ExpiryScheduler, PendingExpiry};
use crate::storage::locks::KeyLocks;
use crate::storage::sorted_set::{SortedSet, SortedSetItem};
use crate::storage::value::{Value, ValueKind};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, trace};

/// Errors returned by store operations.
///
/// A failed operation never leaves a partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The key holds a kind of value the operation does not support
    #[error("key {key:?} holds a {actual} value, expected {expected}")]
    TypeMismatch {
        key: String,
        actual: ValueKind,
        expected: &'static str,
    },

    /// INCR on text that is not an integer
    #[error("key {key:?} holds {value:?}, which is not an integer")]
    NotAnInteger { key: String, value: String },

    /// INCR past the largest counter value
    #[error("increment of key {key:?} would overflow")]
    Overflow { key: String },
}

impl StoreError {
    /// Returns true if the stored value's type does not fit the operation.
    ///
    /// Text that cannot be read as an integer counts as a mismatch for INCR.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            StoreError::TypeMismatch { .. } | StoreError::NotAnInteger { .. }
        )
    }

    fn type_mismatch(key: &str, actual: ValueKind, expected: &'static str) -> Self {
        StoreError::TypeMismatch {
            key: key.to_string(),
            actual,
            expected,
        }
    }
}

/// A live key: its value, the generation it was installed with, and its
/// pending expiration if it has a TTL.
#[derive(Debug)]
struct Entry {
    value: Value,
    generation: u64,
    expiry: Option<PendingExpiry>,
}

impl Entry {
    fn new(value: Value, generation: u64) -> Self {
        Self {
            value,
            generation,
            expiry: None,
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    /// Number of live keys
    pub keys: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total SET/SETEX operations
    pub set_ops: u64,
    /// Total keys removed by DEL
    pub del_ops: u64,
    /// Total INCR operations
    pub incr_ops: u64,
    /// Total sorted set operations
    pub zset_ops: u64,
    /// Total keys removed by TTL timers
    pub expired: u64,
}

struct StoreInner {
    /// Key -> entry
    values: DashMap<String, Entry>,

    /// One lock per key in use
    locks: KeyLocks,

    /// Spawns TTL timers
    scheduler: ExpiryScheduler,

    /// Source of entry generations
    next_generation: AtomicU64,

    get_count: AtomicU64,
    set_count: AtomicU64,
    del_count: AtomicU64,
    incr_count: AtomicU64,
    zset_count: AtomicU64,
    expired_count: AtomicU64,
}

impl StoreInner {
    fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }
}

impl Expire for StoreInner {
    fn expire(&self, key: &str, generation: u64) -> bool {
        let _guard = self.locks.acquire(key);

        let removed = self
            .values
            .remove_if(key, |_, entry| entry.generation == generation)
            .is_some();

        if removed {
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, generation, "Key expired");
        } else {
            trace!(key = %key, generation, "Stale expiry ignored");
        }

        removed
    }
}

/// The rankkv store.
///
/// `Store` is a cheap handle: clones share the same data. Pass it to every
/// layer that needs it instead of keeping a global.
///
/// # Example
///
/// ```ignore
/// use rankkv::storage::{SortedSetItem, Store};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let store = Store::new();
///
///     store.set("name", "Ariz");
///     assert_eq!(store.get("name").unwrap(), Some("Ariz".to_string()));
///
///     store.set_ex("session", "abc123", Some(Duration::from_secs(60)));
///
///     store.zadd("board", [SortedSetItem::new(3.0, "three")]).unwrap();
///     assert_eq!(store.zrank("board", "three").unwrap(), Some(0));
/// }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.inner.values.len())
            .field("locks", &self.inner.locks.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store whose TTL timers run on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime. Use
    /// [`Store::with_config`] with [`StoreConfig::with_runtime`] to pass a
    /// runtime handle explicitly.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.runtime` is `None` and this is called outside of a
    /// tokio runtime.
    pub fn with_config(config: StoreConfig) -> Self {
        let runtime = config.runtime.unwrap_or_else(Handle::current);

        let (values, locks) = match config.shard_amount {
            Some(shards) => (
                DashMap::with_shard_amount(shards),
                KeyLocks::with_shard_amount(shards),
            ),
            None => (DashMap::new(), KeyLocks::new()),
        };

        Self {
            inner: Arc::new(StoreInner {
                values,
                locks,
                scheduler: ExpiryScheduler::new(runtime),
                next_generation: AtomicU64::new(1),
                get_count: AtomicU64::new(0),
                set_count: AtomicU64::new(0),
                del_count: AtomicU64::new(0),
                incr_count: AtomicU64::new(0),
                zset_count: AtomicU64::new(0),
                expired_count: AtomicU64::new(0),
            }),
        }
    }

    // ========================================================================
    // Scalar operations
    // ========================================================================

    /// Stores a value without expiry, dropping any TTL the key had.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.set_ex(key, value, None);
    }

    /// Stores a value, replacing whatever the key held.
    ///
    /// Any pending expiration is cancelled first. With `Some(ttl)` a new
    /// expiration is scheduled; `None` means the key never expires.
    pub fn set_ex(&self, key: &str, value: impl Into<Value>, ttl: Option<Duration>) {
        let _guard = self.inner.locks.acquire(key);
        self.inner.set_count.fetch_add(1, Ordering::Relaxed);

        self.clear_expiry(key);

        let generation = self.inner.next_generation();
        let mut entry = Entry::new(value.into(), generation);

        if let Some(ttl) = ttl {
            entry.expiry = Some(self.inner.scheduler.schedule(
                Arc::downgrade(&self.inner),
                key.to_owned(),
                generation,
                ttl,
            ));
        }

        self.inner.values.insert(key.to_owned(), entry);
    }

    /// Returns the key's value as text.
    ///
    /// Counters are rendered in decimal. Returns `Ok(None)` if the key does
    /// not exist and a type mismatch for sorted sets.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.inner.locks.acquire(key);
        self.inner.get_count.fetch_add(1, Ordering::Relaxed);

        match self.inner.values.get(key) {
            None => Ok(None),
            Some(entry) => match &entry.value {
                Value::Text(text) => Ok(Some(text.clone())),
                Value::Counter(n) => Ok(Some(n.to_string())),
                Value::SortedSet(_) => Err(StoreError::type_mismatch(
                    key,
                    ValueKind::SortedSet,
                    "text or counter",
                )),
            },
        }
    }

    /// Deletes keys, cancelling their TTLs.
    ///
    /// Each key is locked on its own; there is no atomicity across keys.
    ///
    /// # Returns
    ///
    /// The number of keys that existed and were removed.
    pub fn del<K: AsRef<str>>(&self, keys: &[K]) -> usize {
        let mut deleted = 0;
        for key in keys {
            if self.del_one(key.as_ref()) {
                deleted += 1;
            }
        }
        deleted
    }

    fn del_one(&self, key: &str) -> bool {
        let _guard = self.inner.locks.acquire(key);

        // Dropping the entry aborts its timer.
        match self.inner.values.remove(key) {
            Some(_) => {
                self.inner.del_count.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Returns the number of live keys.
    ///
    /// Shards are counted one after another, so with concurrent writers the
    /// result may not match any single instant.
    pub fn db_size(&self) -> usize {
        self.inner.values.len()
    }

    /// Increments the key's integer value by one.
    ///
    /// A missing key starts at 0. Text that parses as an integer is treated as
    /// that integer. The result is stored as a counter; a pending TTL is kept.
    pub fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let _guard = self.inner.locks.acquire(key);
        self.inner.incr_count.fetch_add(1, Ordering::Relaxed);

        let current = match self.inner.values.get(key) {
            None => 0,
            Some(entry) => match &entry.value {
                Value::Counter(n) => *n,
                Value::Text(text) => {
                    text.parse::<i64>()
                        .map_err(|_| StoreError::NotAnInteger {
                            key: key.to_string(),
                            value: text.clone(),
                        })?
                }
                Value::SortedSet(_) => {
                    return Err(StoreError::type_mismatch(
                        key,
                        ValueKind::SortedSet,
                        "text or counter",
                    ))
                }
            },
        };

        let next = current.checked_add(1).ok_or_else(|| StoreError::Overflow {
            key: key.to_string(),
        })?;

        if let Some(mut entry) = self.inner.values.get_mut(key) {
            entry.value = Value::Counter(next);
            return Ok(next);
        }

        let generation = self.inner.next_generation();
        self.inner
            .values
            .insert(key.to_owned(), Entry::new(Value::Counter(next), generation));

        Ok(next)
    }

    // ========================================================================
    // Sorted set operations
    // ========================================================================

    /// Adds members to a sorted set, creating it if the key is missing.
    ///
    /// Existing members get their score updated in place.
    ///
    /// # Returns
    ///
    /// The number of members that were not in the set before.
    pub fn zadd(
        &self,
        key: &str,
        items: impl IntoIterator<Item = SortedSetItem>,
    ) -> Result<usize, StoreError> {
        let _guard = self.inner.locks.acquire(key);
        self.inner.zset_count.fetch_add(1, Ordering::Relaxed);

        if let Some(mut entry) = self.inner.values.get_mut(key) {
            return match &mut entry.value {
                Value::SortedSet(set) => Ok(add_items(set, items)),
                other => Err(StoreError::type_mismatch(
                    key,
                    other.kind(),
                    "a sorted set",
                )),
            };
        }

        let mut set = SortedSet::new();
        let added = add_items(&mut set, items);

        let generation = self.inner.next_generation();
        self.inner
            .values
            .insert(key.to_owned(), Entry::new(Value::SortedSet(set), generation));

        Ok(added)
    }

    /// Returns the number of members in a sorted set, 0 if the key is missing.
    pub fn zcard(&self, key: &str) -> Result<usize, StoreError> {
        self.read_sorted_set(key, 0, |set| set.len())
    }

    /// Returns a member's 0-based rank in ascending score order.
    pub fn zrank(&self, key: &str, member: &str) -> Result<Option<usize>, StoreError> {
        self.read_sorted_set(key, None, |set| set.position(member))
    }

    /// Returns the members between `start` and `stop`, inclusive.
    ///
    /// See [`SortedSet::slice`] for how out-of-range and negative indices are
    /// handled.
    pub fn zrange(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<SortedSetItem>, StoreError> {
        self.read_sorted_set(key, Vec::new(), |set| set.slice(start, stop))
    }

    /// Runs `read` against the key's sorted set under the key lock.
    ///
    /// Returns `missing` if the key does not exist.
    fn read_sorted_set<T>(
        &self,
        key: &str,
        missing: T,
        read: impl FnOnce(&SortedSet) -> T,
    ) -> Result<T, StoreError> {
        let _guard = self.inner.locks.acquire(key);
        self.inner.zset_count.fetch_add(1, Ordering::Relaxed);

        match self.inner.values.get(key) {
            None => Ok(missing),
            Some(entry) => match &entry.value {
                Value::SortedSet(set) => Ok(read(set)),
                other => Err(StoreError::type_mismatch(
                    key,
                    other.kind(),
                    "a sorted set",
                )),
            },
        }
    }

    // ========================================================================
    // Key inspection
    // ========================================================================

    /// Returns the time left before the key expires.
    ///
    /// `None` if the key does not exist or has no TTL.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let _guard = self.inner.locks.acquire(key);

        self.inner
            .values
            .get(key)
            .and_then(|entry| entry.expiry.as_ref().map(PendingExpiry::remaining))
    }

    /// Returns the kind of value stored under the key.
    pub fn key_type(&self, key: &str) -> Option<ValueKind> {
        let _guard = self.inner.locks.acquire(key);

        self.inner.values.get(key).map(|entry| entry.value.kind())
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.inner.values.len() as u64,
            get_ops: self.inner.get_count.load(Ordering::Relaxed),
            set_ops: self.inner.set_count.load(Ordering::Relaxed),
            del_ops: self.inner.del_count.load(Ordering::Relaxed),
            incr_ops: self.inner.incr_count.load(Ordering::Relaxed),
            zset_ops: self.inner.zset_count.load(Ordering::Relaxed),
            expired: self.inner.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Cancels the key's pending expiration, if any. Caller holds the key lock.
    fn clear_expiry(&self, key: &str) {
        if let Some(mut entry) = self.inner.values.get_mut(key) {
            if let Some(expiry) = entry.expiry.take() {
                trace!(key = %key, generation = expiry.generation(), "Cancelled expiry");
            }
        }
    }
}

fn add_items(set: &mut SortedSet, items: impl IntoIterator<Item = SortedSetItem>) -> usize {
    let mut added = 0;
    for item in items {
        if set.set(item.score, item.member) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn members(items: Vec<SortedSetItem>) -> Vec<String> {
        items.into_iter().map(|item| item.member).collect()
    }

    fn generation_of(store: &Store, key: &str) -> Option<u64> {
        store.inner.values.get(key).map(|entry| entry.generation)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = Store::new();

        store.set("key", "value");
        assert_eq!(store.get("key"), Ok(Some("value".to_string())));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = Store::new();
        assert_eq!(store.get("nonexistent"), Ok(None));
    }

    #[tokio::test]
    async fn test_get_counter_as_text() {
        let store = Store::new();

        store.set("n", 42i64);
        assert_eq!(store.get("n"), Ok(Some("42".to_string())));
    }

    #[tokio::test]
    async fn test_get_sorted_set_is_type_mismatch() {
        let store = Store::new();

        assert_ok!(store.zadd("z", [SortedSetItem::new(1.0, "one")]));
        let err = assert_err!(store.get("z"));
        assert!(err.is_type_mismatch());
    }

    #[tokio::test]
    async fn test_del() {
        let store = Store::new();

        store.set("fizz", "1");
        store.set("buzz", "2");

        assert_eq!(store.del(&["foo", "fizz", "buzz"]), 2);
        assert_eq!(store.get("fizz"), Ok(None));
        assert_eq!(store.get("buzz"), Ok(None));
        assert_eq!(store.del(&["fizz"]), 0);
    }

    #[tokio::test]
    async fn test_db_size() {
        let store = Store::new();
        assert_eq!(store.db_size(), 0);

        store.set("a", "1");
        store.set("b", "2");
        assert_ok!(store.incr("c"));
        assert_ok!(store.zadd("d", [SortedSetItem::new(1.0, "x")]));
        assert_eq!(store.db_size(), 4);

        store.del(&["a"]);
        assert_eq!(store.db_size(), 3);
    }

    #[tokio::test]
    async fn test_incr() {
        let store = Store::new();

        // INCR on non-existent key
        assert_eq!(store.incr("counter"), Ok(1));
        assert_eq!(store.incr("counter"), Ok(2));
        assert_eq!(store.key_type("counter"), Some(ValueKind::Counter));

        // INCR on numeric text
        store.set("num", "10");
        assert_eq!(store.incr("num"), Ok(11));
        assert_eq!(store.key_type("num"), Some(ValueKind::Counter));
        assert_eq!(store.get("num"), Ok(Some("11".to_string())));
    }

    #[tokio::test]
    async fn test_incr_non_integer_text_leaves_value() {
        let store = Store::new();

        store.set("text", "hello");
        let err = assert_err!(store.incr("text"));
        assert!(err.is_type_mismatch());
        assert_eq!(store.get("text"), Ok(Some("hello".to_string())));
    }

    #[tokio::test]
    async fn test_incr_sorted_set_is_type_mismatch() {
        let store = Store::new();

        assert_ok!(store.zadd("z", [SortedSetItem::new(1.0, "one")]));
        let err = assert_err!(store.incr("z"));
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                actual: ValueKind::SortedSet,
                ..
            }
        ));
        assert_eq!(store.zcard("z"), Ok(1));
    }

    #[tokio::test]
    async fn test_incr_overflow() {
        let store = Store::new();

        store.set("max", i64::MAX);
        assert_eq!(
            store.incr("max"),
            Err(StoreError::Overflow {
                key: "max".to_string()
            })
        );
        assert_eq!(store.get("max"), Ok(Some(i64::MAX.to_string())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_incr() {
        let store = Store::new();
        let mut handles = Vec::with_capacity(1000);

        for _ in 0..1000 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.incr("hits") }));
        }

        for handle in handles {
            assert_ok!(handle.await.unwrap());
        }

        assert_eq!(store.get("hits"), Ok(Some("1000".to_string())));
    }

    #[test]
    fn test_concurrent_access_from_threads() {
        use std::thread;

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Store::with_config(StoreConfig::default().with_runtime(runtime.handle().clone()));
        let mut handles = vec![];

        // Spawn multiple writers
        for i in 0..10 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("key-{}-{}", i, j);
                    store.set(&key, "value");
                    store.get(&key).unwrap();
                    store.incr("shared").unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.db_size(), 1001);
        assert_eq!(store.get("shared"), Ok(Some("1000".to_string())));
    }

    #[tokio::test]
    async fn test_zadd_zcard_zrank_zrange() {
        let store = Store::new();

        assert_eq!(store.zadd("z", [SortedSetItem::new(3.0, "three")]), Ok(1));
        assert_eq!(store.zcard("z"), Ok(1));
        assert_eq!(store.zrank("z", "three"), Ok(Some(0)));
        assert_eq!(members(store.zrange("z", 0, 0).unwrap()), vec!["three"]);
    }

    #[tokio::test]
    async fn test_zadd_existing_member_updates_rank() {
        let store = Store::new();

        let added = store.zadd(
            "z",
            [
                SortedSetItem::new(1.0, "one"),
                SortedSetItem::new(2.0, "two"),
                SortedSetItem::new(3.0, "three"),
            ],
        );
        assert_eq!(added, Ok(3));

        assert_eq!(store.zadd("z", [SortedSetItem::new(10.0, "one")]), Ok(0));
        assert_eq!(store.zcard("z"), Ok(3));
        assert_eq!(store.zrank("z", "one"), Ok(Some(2)));
        assert_eq!(store.zrank("z", "two"), Ok(Some(0)));
        assert_eq!(
            members(store.zrange("z", 0, 10).unwrap()),
            vec!["two", "three", "one"]
        );
        assert_eq!(members(store.zrange("z", -3, -1).unwrap()), vec!["two", "three", "one"]);
        assert_eq!(store.zrange("z", 0, -1), Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_sorted_set_missing_key() {
        let store = Store::new();

        assert_eq!(store.zcard("missing"), Ok(0));
        assert_eq!(store.zrank("missing", "member"), Ok(None));
        assert_eq!(store.zrange("missing", 0, 10), Ok(Vec::new()));
        // Reads do not create entries
        assert_eq!(store.db_size(), 0);
    }

    #[tokio::test]
    async fn test_zrange_edge_cases() {
        let store = Store::new();
        assert_ok!(store.zadd(
            "z",
            [
                SortedSetItem::new(1.0, "a"),
                SortedSetItem::new(2.0, "b"),
                SortedSetItem::new(3.0, "c"),
            ],
        ));

        assert_eq!(store.zrange("z", 2, 1), Ok(Vec::new()));
        assert_eq!(store.zrange("z", 3, 5), Ok(Vec::new()));
        assert_eq!(members(store.zrange("z", -2, -1).unwrap()), vec!["b", "c"]);
        assert_eq!(members(store.zrange("z", 1, 100).unwrap()), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_sorted_set_ops_on_scalar_are_type_mismatch() {
        let store = Store::new();
        store.set("text", "hello");

        let err = assert_err!(store.zadd("text", [SortedSetItem::new(1.0, "a")]));
        assert_eq!(
            err,
            StoreError::TypeMismatch {
                key: "text".to_string(),
                actual: ValueKind::Text,
                expected: "a sorted set",
            }
        );
        assert!(assert_err!(store.zcard("text")).is_type_mismatch());
        assert!(assert_err!(store.zrank("text", "a")).is_type_mismatch());
        assert!(assert_err!(store.zrange("text", 0, 1)).is_type_mismatch());

        // No partial mutation
        assert_eq!(store.get("text"), Ok(Some("hello".to_string())));
    }

    #[tokio::test]
    async fn test_set_replaces_any_variant() {
        let store = Store::new();

        assert_ok!(store.zadd("key", [SortedSetItem::new(1.0, "a")]));
        store.set("key", "text");
        assert_eq!(store.key_type("key"), Some(ValueKind::Text));
        assert_eq!(store.get("key"), Ok(Some("text".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_ex_expires() {
        let store = Store::new();

        store.set_ex("session", "token", Some(Duration::from_millis(50)));
        assert_eq!(store.get("session"), Ok(Some("token".to_string())));
        assert!(store.ttl("session").is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("session"), Ok(None));
        assert_eq!(store.db_size(), 0);
        assert_eq!(store.stats().expired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_clears_previous_ttl() {
        let store = Store::new();

        store.set_ex("key", "old", Some(Duration::from_millis(50)));
        store.set("key", "new");
        assert_eq!(store.ttl("key"), None);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("key"), Ok(Some("new".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_ex_replaces_ttl() {
        let store = Store::new();

        store.set_ex("key", "v1", Some(Duration::from_millis(50)));
        store.set_ex("key", "v2", Some(Duration::from_secs(60)));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("key"), Ok(Some("v2".to_string())));
        let ttl = store.ttl("key").unwrap();
        assert!(ttl > Duration::from_secs(50) && ttl <= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_expires_immediately() {
        let store = Store::new();

        store.set_ex("key", "value", Some(Duration::ZERO));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.get("key"), Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incr_keeps_ttl() {
        let store = Store::new();

        store.set_ex("counter", "5", Some(Duration::from_millis(50)));
        assert_eq!(store.incr("counter"), Ok(6));
        assert!(store.ttl("counter").is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("counter"), Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_del_cancels_ttl() {
        let store = Store::new();

        store.set_ex("key", "v1", Some(Duration::from_millis(50)));
        assert_eq!(store.del(&["key"]), 1);
        store.set("key", "v2");

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("key"), Ok(Some("v2".to_string())));
        assert_eq!(store.stats().expired, 0);
    }

    #[tokio::test]
    async fn test_stale_expiry_is_ignored() {
        let store = Store::new();

        store.set_ex("key", "v1", Some(Duration::from_secs(60)));
        let stale = generation_of(&store, "key").unwrap();

        // Rewrite, then simulate the old timer having already woken up
        store.set("key", "v2");
        assert_ne!(generation_of(&store, "key"), Some(stale));
        assert!(!store.inner.expire("key", stale));
        assert_eq!(store.get("key"), Ok(Some("v2".to_string())));

        // The current generation is honoured
        let current = generation_of(&store, "key").unwrap();
        assert!(store.inner.expire("key", current));
        assert_eq!(store.get("key"), Ok(None));
    }

    #[tokio::test]
    async fn test_generations_increase() {
        let store = Store::new();

        store.set("a", "1");
        let first = generation_of(&store, "a").unwrap();
        store.set("a", "2");
        let second = generation_of(&store, "a").unwrap();
        assert!(second > first);

        // In-place mutation keeps the generation
        store.set("n", 1i64);
        let before = generation_of(&store, "n").unwrap();
        assert_ok!(store.incr("n"));
        assert_eq!(generation_of(&store, "n"), Some(before));
    }

    #[tokio::test]
    async fn test_locks_are_reclaimed() {
        let store = Store::new();

        for i in 0..100 {
            let key = format!("key-{}", i);
            store.set(&key, "value");
            store.get(&key).unwrap();
        }
        store.del(&["key-0", "key-1"]);

        assert_eq!(store.inner.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = Store::new();

        store.set("a", "1");
        store.get("a").unwrap();
        store.incr("a").unwrap();
        store.del(&["a", "b"]);

        let stats = store.stats();
        assert_eq!(stats.keys, 0);
        assert_eq!(stats.set_ops, 1);
        assert_eq!(stats.get_ops, 1);
        assert_eq!(stats.incr_ops, 1);
        assert_eq!(stats.del_ops, 1);
    }

    #[tokio::test]
    async fn test_sharded_config() {
        let store = Store::with_config(StoreConfig::default().with_shard_amount(4));

        for i in 0..50 {
            store.set(&format!("key-{}", i), "value");
        }
        assert_eq!(store.db_size(), 50);
    }
}
