use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

/// Handle to the single active position watch of a tracker.
///
/// Cloning shares the handle. Stopping is idempotent and waits for a delivery
/// already in flight, so once it returns no further fix is delivered.
#[derive(Debug, Clone)]
pub struct WatchHandle {
    inner: Arc<WatchInner>,
}

#[derive(Debug)]
struct WatchInner {
    id: u64,
    /// Held across every delivery of a watch fix
    active: Mutex<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WatchHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self { inner: Arc::new(WatchInner { id, active: Mutex::new(true), task: Mutex::new(None) }) }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn is_active(&self) -> bool {
        *self.lock_active()
    }

    /// Run `deliver` unless the watch has been stopped, holding off `stop` until it returns.
    pub(crate) fn deliver_if_active(&self, deliver: impl FnOnce()) -> bool {
        let active = self.lock_active();
        if *active {
            deliver();
        }
        *active
    }

    fn lock_active(&self) -> MutexGuard<'_, bool> {
        self.inner.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the forwarding task. If the watch was stopped in the meantime the task is aborted.
    pub(crate) fn attach(&self, task: JoinHandle<()>) {
        let mut slot = self.inner.task.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_active() {
            *slot = Some(task);
        } else {
            task.abort();
        }
    }

    /// Returns `true` if this call is the one that stopped the watch.
    pub(crate) fn stop(&self) -> bool {
        let was_active = std::mem::replace(&mut *self.lock_active(), false);
        if let Some(task) = self.inner.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            task.abort();
        }
        was_active
    }
}

impl PartialEq for WatchHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}
