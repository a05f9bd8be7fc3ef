//! Per-formation mutual exclusion
//!
//! The two participants of a formation notify independently and may race on
//! the ledger read-then-write. Holding a formation guard for the duration of
//! one notification serializes them within this process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of async mutexes keyed by formation id.
///
/// Entries are removed once no task holds or waits for them.
#[derive(Clone, Default)]
pub struct FormationLocks {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl FormationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `formation_id`.
    pub async fn lock(&self, formation_id: Uuid) -> FormationGuard {
        let mutex = Arc::clone(self.locks.entry(formation_id).or_default().value());
        let guard = mutex.lock_owned().await;

        FormationGuard { locks: Arc::clone(&self.locks), formation_id, guard: Some(guard) }
    }

    /// Number of formations with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one formation, released on drop.
pub struct FormationGuard {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
    formation_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FormationGuard {
    fn drop(&mut self) {
        // Release the mutex first so the map holds the only reference when
        // nobody else is waiting.
        drop(self.guard.take());
        self.locks.remove_if(&self.formation_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
