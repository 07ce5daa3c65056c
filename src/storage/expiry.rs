//! TTL Expiration Timers
//!
//! Each key with a TTL owns exactly one pending timer: a tokio task that
//! sleeps until the deadline and then asks the store to delete the key.
//!
//! ## Generations
//!
//! ```text
//!   SET k v EX 1    entry{gen: 7}  timer(k, 7) ─────────────┐
//!   SET k w         entry{gen: 8}  timer(k, 7) aborted      │ already past
//!                                                           │ its sleep?
//!   timer fires ──> lock(k) ──> entry.gen == 7 ? ──no──> no-op
//! ```
//!
//! Aborting the old task covers the common case. The generation check covers
//! a callback that had already woken up and was waiting for the key lock
//! while the key was rewritten: it finds a newer generation and leaves the
//! value alone.

use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::trace;

/// Upper bound for deadlines so `now + ttl` cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(86400 * 365 * 30);

/// Something that can delete a key on behalf of an expired timer.
pub trait Expire: Send + Sync + 'static {
    /// Deletes `key` if its entry still carries `generation`.
    ///
    /// Returns `true` if an entry was removed.
    fn expire(&self, key: &str, generation: u64) -> bool;
}

/// A scheduled deletion. Dropping it cancels the timer.
#[derive(Debug)]
pub struct PendingExpiry {
    /// Generation of the entry this timer was scheduled for
    generation: u64,
    /// When the timer fires
    deadline: Instant,
    /// Handle to the sleeping task
    task: AbortHandle,
}

impl PendingExpiry {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left before the timer fires (zero once it is due).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl Drop for PendingExpiry {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns expiration timers on a tokio runtime.
#[derive(Debug, Clone)]
pub struct ExpiryScheduler {
    runtime: Handle,
}

impl ExpiryScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Schedules deletion of `key` after `ttl`.
    ///
    /// The timer only holds a weak reference to the target, so pending timers
    /// never keep a dropped store alive.
    pub fn schedule<E: Expire>(
        &self,
        target: Weak<E>,
        key: String,
        generation: u64,
        ttl: Duration,
    ) -> PendingExpiry {
        let deadline = Instant::now() + ttl.min(MAX_TTL);

        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        trace!(key = %key, generation, ttl_ms, "Scheduling expiry");

        let task = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;

            match target.upgrade() {
                Some(target) => {
                    target.expire(&key, generation);
                }
                None => trace!(key = %key, "Store dropped before expiry fired"),
            }
        });

        PendingExpiry {
            generation,
            deadline,
            task: task.abort_handle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        fired: Mutex<Vec<(String, u64)>>,
    }

    impl Expire for Recorder {
        fn expire(&self, key: &str, generation: u64) -> bool {
            self.fired.lock().push((key.to_string(), generation));
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = ExpiryScheduler::new(Handle::current());

        let pending = scheduler.schedule(
            Arc::downgrade(&recorder),
            "key".to_string(),
            3,
            Duration::from_millis(20),
        );
        assert_eq!(pending.generation(), 3);
        assert!(pending.remaining() <= Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(*recorder.fired.lock(), vec![("key".to_string(), 3)]);
        assert_eq!(pending.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = ExpiryScheduler::new(Handle::current());

        let pending = scheduler.schedule(
            Arc::downgrade(&recorder),
            "key".to_string(),
            1,
            Duration::from_millis(20),
        );
        drop(pending);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(recorder.fired.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_target_is_ignored() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = ExpiryScheduler::new(Handle::current());

        let _pending = scheduler.schedule(
            Arc::downgrade(&recorder),
            "key".to_string(),
            1,
            Duration::from_millis(10),
        );
        drop(recorder);

        // Nothing to observe beyond the task not panicking
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_huge_ttl_does_not_overflow() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = ExpiryScheduler::new(Handle::current());

        let pending = scheduler.schedule(
            Arc::downgrade(&recorder),
            "key".to_string(),
            1,
            Duration::MAX,
        );
        assert!(pending.remaining() > Duration::from_secs(86400));
    }
}
