//! Per-record in-flight tracking.
//!
//! A record with a change in flight rejects further changes until the guard for
//! the first change is dropped. Records are tracked independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::WorkId;

#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    active: Arc<Mutex<HashMap<WorkId, u64>>>,
    next_token: Arc<AtomicU64>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in flight. Returns `None` when another change already holds it.
    pub fn try_acquire(&self, id: WorkId) -> Option<InFlightGuard> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if active.contains_key(&id) {
            return None;
        }
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        active.insert(id, token);
        Some(InFlightGuard {
            id,
            token,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_in_flight(&self, id: WorkId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Releases the record when dropped, on success and failure alike.
#[derive(Debug)]
pub struct InFlightGuard {
    id: WorkId,
    token: u64,
    active: Arc<Mutex<HashMap<WorkId, u64>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if active.get(&self.id) == Some(&self.token) {
            active.remove(&self.id);
        }
    }
}
