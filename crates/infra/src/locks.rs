use activity_scheduler_domain::ID;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async locks making sure that at most one reminder sync runs for
/// an `Activity` at a time within this process.
#[derive(Default)]
pub struct ActivityLocks {
    locks: DashMap<ID, Arc<Mutex<()>>>,
}

impl ActivityLocks {
    pub fn new() -> Self {
        Default::default()
    }

    /// Waits until no other holder of the lock for `activity_id` is left.
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, activity_id: &ID) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(activity_id.clone()).or_default().clone();
        lock.lock_owned().await
    }

    /// Drops the locks that nobody holds or waits for
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
