//! Per-Key Lock Registry
//!
//! Every store operation holds the lock of the key it touches for its whole
//! critical section. Locks are created lazily on first use and handed out as
//! RAII guards, so a lock is released on every exit path, including early
//! `?` returns.
//!
//! ## Reclamation
//!
//! ```text
//!   acquire("a") ──> registry["a"] = Arc<Mutex>   (strong = 2: map + guard)
//!   acquire("a") ──> clone, wait on the mutex      (strong = 3)
//!   guard #1 drop ──> unlock                       (strong = 2, kept)
//!   guard #2 drop ──> unlock                       (strong = 1, removed)
//! ```
//!
//! A lock is dropped from the registry once the only remaining reference is
//! the registry's own. Handing out a reference and removing an entry both
//! happen under the registry shard lock, so a waiter can never be left holding
//! a lock that a later caller does not also see.

use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::Arc;

type KeyLock = Arc<Mutex<()>>;

/// Lazily-populated table of one mutex per key.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, KeyLock>,
}

impl KeyLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose internal map uses `shards` shards.
    ///
    /// `shards` must be a power of two greater than one.
    pub fn with_shard_amount(shards: usize) -> Self {
        Self {
            locks: DashMap::with_shard_amount(shards),
        }
    }

    /// Blocks until the calling thread holds `key`'s lock.
    ///
    /// Callers racing to create the same key's lock all end up with the same
    /// mutex: creation goes through the map's entry API.
    pub fn acquire<'a>(&'a self, key: &'a str) -> KeyGuard<'a> {
        let existing = self.locks.get(key).map(|lock| Arc::clone(lock.value()));
        let lock = match existing {
            Some(lock) => lock,
            None => Arc::clone(self.locks.entry(key.to_owned()).or_default().value()),
        };

        // The map reference is released before blocking on the key.
        let guard = lock.lock_arc();

        KeyGuard {
            registry: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of locks currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn release(&self, key: &str) {
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Exclusive hold on one key. Unlocks on drop.
pub struct KeyGuard<'a> {
    registry: &'a KeyLocks,
    key: &'a str,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl KeyGuard<'_> {
    /// The key this guard protects.
    pub fn key(&self) -> &str {
        self.key
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the registry sees only its own reference when idle.
        drop(self.guard.take());
        self.registry.release(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_acquire_and_release() {
        let locks = KeyLocks::new();

        {
            let guard = locks.acquire("key");
            assert_eq!(guard.key(), "key");
            assert_eq!(locks.len(), 1);
        }

        // Nobody holds or waits on the lock anymore
        assert!(locks.is_empty());
    }

    #[test]
    fn test_different_keys_do_not_block() {
        let locks = KeyLocks::new();

        let _a = locks.acquire("a");
        let _b = locks.acquire("b");
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    let _guard = locks.acquire("shared");
                    if inside.swap(true, Ordering::SeqCst) {
                        overlaps.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::yield_now();
                    inside.store(false, Ordering::SeqCst);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert!(locks.is_empty());
    }

    #[test]
    fn test_waiter_keeps_lock_alive() {
        let locks = Arc::new(KeyLocks::new());
        let guard = locks.acquire("key");

        let waiter = {
            let locks = Arc::clone(&locks);
            thread::spawn(move || {
                let _guard = locks.acquire("key");
            })
        };

        // Give the waiter time to block on the mutex
        thread::sleep(Duration::from_millis(50));
        drop(guard);
        assert!(locks.len() <= 1);

        waiter.join().unwrap();
        assert!(locks.is_empty());
    }

    #[test]
    fn test_sharded_registry() {
        let locks = KeyLocks::with_shard_amount(4);
        for i in 0..32 {
            let key = format!("key-{}", i);
            let _guard = locks.acquire(&key);
        }
        assert!(locks.is_empty());
    }
}
