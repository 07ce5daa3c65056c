//! Store configuration.

use tokio::runtime::Handle;

/// Configuration for a [`Store`](crate::storage::Store).
///
/// # Example
///
/// ```ignore
/// use rankkv::storage::{Store, StoreConfig};
///
/// let config = StoreConfig::default().with_shard_amount(64);
/// let store = Store::with_config(config);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Shard count for the value table and lock registry.
    /// `None` lets the map pick one from the number of CPUs.
    pub shard_amount: Option<usize>,

    /// Runtime the TTL timers are spawned on.
    /// `None` means the runtime the store is created in.
    pub runtime: Option<Handle>,
}

impl StoreConfig {
    /// Sets the shard count, rounded up to a power of two (at least 2).
    pub fn with_shard_amount(mut self, shards: usize) -> Self {
        self.shard_amount = Some(shards.max(2).next_power_of_two());
        self
    }

    /// Spawns TTL timers on `runtime` instead of the current one.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}
