//! Per-key build serialization.
//!
//! Callers that want to build the same page take the same key lock, so at
//! most one build per key runs at a time. Entries are dropped from the map as
//! soon as nobody holds or waits on them, which keeps the map bounded by the
//! number of builds actually in progress.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};

type InflightMap = HashMap<String, Arc<Mutex<()>>>;

/// Hands out one async lock per key.
#[derive(Debug, Default, Clone)]
pub struct BuildCoalescer {
    inflight: Arc<StdMutex<InflightMap>>,
}

impl BuildCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive build rights on `key`.
    pub async fn acquire(&self, key: &str) -> BuildGuard {
        let lock = {
            let mut inflight = self.lock_map();
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let guard = lock.lock_owned().await;
        BuildGuard {
            key: key.to_string(),
            inflight: Arc::clone(&self.inflight),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited.
    pub fn inflight_len(&self) -> usize {
        self.lock_map().len()
    }

    fn lock_map(&self) -> std::sync::MutexGuard<'_, InflightMap> {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive build rights on one key, released on drop.
#[derive(Debug)]
pub struct BuildGuard {
    key: String,
    inflight: Arc<StdMutex<InflightMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl BuildGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Release while holding the map lock so no new waiter can clone the
        // entry between the release and the count check.
        self.guard.take();
        let idle = inflight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            inflight.remove(&self.key);
        }
    }
}
