use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::error;

use crate::types::location::LocationFix;

pub type LocationCallback = Arc<dyn Fn(&LocationFix) + Send + Sync>;

type Entries = Mutex<Vec<(u64, LocationCallback)>>;

fn lock(entries: &Entries) -> MutexGuard<'_, Vec<(u64, LocationCallback)>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out list of location subscribers.
///
/// Notification iterates over a snapshot, so callbacks may subscribe or
/// unsubscribe (themselves included) while being notified.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    entries: Arc<Entries>,
}

impl SubscriberRegistry {
    pub fn insert(&self, callback: LocationCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, callback));
        Subscription { id, entries: Arc::downgrade(&self.entries) }
    }

    pub fn notify(&self, fix: &LocationFix) {
        let snapshot: Vec<LocationCallback> = lock(&self.entries).iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for callback in snapshot {
            deliver(&callback, fix);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

/// Invoke one subscriber. A panicking subscriber is logged and skipped.
pub(crate) fn deliver(callback: &LocationCallback, fix: &LocationFix) {
    if catch_unwind(AssertUnwindSafe(|| callback(fix))).is_err() {
        error!(captured_at_ms = fix.captured_at_ms, "Location subscriber panicked, skipping it");
    }
}

/// Handle returned by `subscribe`. Dropping it (or calling [`Subscription::unsubscribe`])
/// removes the subscriber.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    entries: Weak<Entries>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        let Some(entries) = self.entries.upgrade() else {
            return false;
        };
        let active = lock(&entries).iter().any(|(id, _)| *id == self.id);
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            lock(&entries).retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
