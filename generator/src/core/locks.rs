//! Per-series mutual exclusion for the check-then-insert window

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SeriesLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SeriesLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `series`
    ///
    /// The guard is owned so it can travel into a detached write task.
    /// Entries nobody holds or waits on are dropped here, so the map only
    /// tracks series with live guards.
    pub async fn acquire(&self, series: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            evict_idle(&mut locks);
            Arc::clone(locks.entry(series.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Series currently held or awaited
    pub fn tracked_series(&self) -> usize {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        evict_idle(&mut locks);
        locks.len()
    }
}

/// Guards and waiters each own a clone; a count of one means only the map does
fn evict_idle(locks: &mut HashMap<String, Arc<AsyncMutex<()>>>) {
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
}
