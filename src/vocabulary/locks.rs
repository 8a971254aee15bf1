//! Per-partition serialization of vocabulary read-modify-write cycles.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per parent-category partition, created on first use.
///
/// Holding the guard across `load → merge → store` keeps two writers in the
/// same partition from overwriting each other's appended tokens. Only
/// writers sharing this registry are serialized; separate processes still
/// race on the store.
#[derive(Debug, Default)]
pub struct PartitionLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl PartitionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `partition`.
    pub async fn lock(&self, partition: i64) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(partition).or_default().value().clone();
        lock.lock_owned().await
    }

    /// Partitions seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
