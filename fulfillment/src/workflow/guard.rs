use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::geo::{Coordinate, Geofence, GeofenceReading};
use crate::types::location::LocationFix;

/// Live state of the "confirm arrival" action as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrivalGuard {
    pub reading: GeofenceReading,
    pub fix_is_fallback: bool,
}

impl ArrivalGuard {
    pub fn is_open(&self) -> bool {
        self.reading.in_range
    }
}

/// Re-evaluates the geofence on every fix while the session waits for arrival.
pub(crate) struct ArrivalMonitor {
    geofence: Geofence,
    target: Coordinate,
    armed: AtomicBool,
    status: watch::Sender<ArrivalGuard>,
}

impl ArrivalMonitor {
    pub fn new(geofence: Geofence, target: Coordinate, armed: bool) -> Self {
        let initial = ArrivalGuard { reading: geofence.evaluate(None, Some(&target)), fix_is_fallback: false };
        let (status, _) = watch::channel(initial);
        Self { geofence, target, armed: AtomicBool::new(armed), status }
    }

    pub fn evaluate(&self, fix: Option<&LocationFix>) -> GeofenceReading {
        self.geofence.evaluate(fix, Some(&self.target))
    }

    /// Called from the tracker subscription.
    pub fn on_fix(&self, fix: &LocationFix) {
        if !self.armed.load(Ordering::SeqCst) {
            return;
        }
        let guard = ArrivalGuard { reading: self.evaluate(Some(fix)), fix_is_fallback: fix.is_fallback };
        self.status.send_if_modified(|current| {
            let changed = *current != guard;
            *current = guard;
            changed
        });
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn subscribe(&self) -> watch::Receiver<ArrivalGuard> {
        self.status.subscribe()
    }

    pub fn current(&self) -> ArrivalGuard {
        *self.status.borrow()
    }
}
