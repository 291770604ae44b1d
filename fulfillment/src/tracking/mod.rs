pub mod permission;
pub mod registry;
pub mod watch;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::client::location::{DeviceLocationProvider, LocationProviderError};
use crate::error::location::{LocationError, UnavailableReason};
use crate::geo::Coordinate;
use crate::types::location::{Address, DevicePosition, LocationFix, PermissionState, RoleHint, WatchOptions};
use crate::types::params::TrackingParams;
use permission::PermissionCache;
pub use registry::{LocationCallback, Subscription};
use registry::{deliver, SubscriberRegistry};
pub use watch::WatchHandle;

/// State shared between the tracker and its watch forwarding task
#[derive(Default)]
struct TrackerShared {
    current: RwLock<Option<LocationFix>>,
    registry: SubscriberRegistry,
}

impl TrackerShared {
    fn current(&self) -> Option<LocationFix> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Store `fix` as the current one, then notify every subscriber.
    fn publish(&self, fix: LocationFix) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(fix.clone());
        self.registry.notify(&fix);
    }
}

/// Location tracking engine for one fulfillment session.
///
/// Owns the permission lifecycle, the current fix, at most one position watch
/// and the subscribers that are told about every new fix.
pub struct LocationTracker {
    provider: Arc<dyn DeviceLocationProvider>,
    params: TrackingParams,
    shared: Arc<TrackerShared>,
    permission: tokio::sync::Mutex<PermissionCache>,
    active_watch: Mutex<Option<WatchHandle>>,
    next_watch_id: AtomicU64,
}

impl LocationTracker {
    pub fn new(provider: Arc<dyn DeviceLocationProvider>, params: TrackingParams) -> Self {
        Self {
            provider,
            params,
            shared: Arc::new(TrackerShared::default()),
            permission: tokio::sync::Mutex::new(PermissionCache::default()),
            active_watch: Mutex::new(None),
            next_watch_id: AtomicU64::new(1),
        }
    }

    pub fn params(&self) -> &TrackingParams {
        &self.params
    }

    /// The last fix produced by this tracker, real or fallback.
    pub fn current_fix(&self) -> Option<LocationFix> {
        self.shared.current()
    }

    pub async fn permission_state(&self) -> PermissionState {
        self.permission.lock().await.state
    }

    /// Ask for location access on behalf of `role`.
    ///
    /// Returns immediately when access is already settled. Tracking roles also
    /// try to obtain background access, failing that is not an error.
    pub async fn request_permission(&self, role: RoleHint) -> PermissionState {
        let mut cache = self.permission.lock().await;
        permission::negotiate(self.provider.as_ref(), &mut cache, role).await
    }

    /// Open the system settings so the user can re-enable a denied permission.
    pub fn open_settings(&self) -> Result<(), LocationProviderError> {
        info!("Opening system settings for location permission");
        self.provider.open_settings()
    }

    pub async fn get_current_fix(&self) -> Result<LocationFix, LocationError> {
        self.get_current_fix_with_timeout(self.params.fix_timeout).await
    }

    /// Acquire a one-shot fix, store it and notify subscribers.
    ///
    /// Without permission this yields the last known fix, or the fallback
    /// coordinate when there never was one. The services check and the position
    /// request share `timeout`; reverse geocoding has its own budget and only
    /// ever costs the address.
    #[tracing::instrument(skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    pub async fn get_current_fix_with_timeout(&self, timeout: Duration) -> Result<LocationFix, LocationError> {
        if !self.request_permission(self.params.role).await.is_granted() {
            return Ok(self.last_or_fallback());
        }

        let position = match tokio::time::timeout(timeout, self.acquire_position()).await {
            Ok(Ok(position)) => position,
            Ok(Err(LocationProviderError::PermissionRevoked)) => {
                self.permission.lock().await.revoke();
                warn!("Location permission revoked while acquiring a fix");
                return Ok(self.last_or_fallback());
            }
            Ok(Err(e)) => return Err(unavailable_from(e)),
            Err(_) => {
                return Err(LocationError::unavailable(
                    UnavailableReason::Timeout,
                    format!("no fix within {} ms", timeout.as_millis()),
                ))
            }
        };

        let mut fix = LocationFix::from_device(position);
        if self.params.reverse_geocode_fixes {
            fix.address = self.reverse_geocode(&fix.coordinate).await;
        }
        debug!(accuracy_meters = ?fix.accuracy_meters, has_address = fix.address.is_some(), "Acquired location fix");
        self.shared.publish(fix.clone());
        Ok(fix)
    }

    async fn acquire_position(&self) -> Result<DevicePosition, LocationProviderError> {
        match self.provider.services_enabled().await {
            Ok(true) => {}
            Ok(false) => return Err(LocationProviderError::ServicesDisabled),
            Err(e) => warn!(error = %e, "Could not read location services state, trying anyway"),
        }
        self.provider.current_position(self.params.accuracy).await
    }

    /// Best-effort reverse geocoding, bounded by the configured geocode timeout.
    /// Never fails, `None` means nothing usable came back in time.
    pub async fn reverse_geocode(&self, coordinate: &Coordinate) -> Option<Address> {
        match tokio::time::timeout(self.params.geocode_timeout, self.provider.reverse_geocode(*coordinate)).await {
            Ok(Ok(places)) => places.into_iter().next().map(|place| {
                Address::new(place.street, place.city, place.region, place.country, place.postal_code)
            }),
            Ok(Err(e)) => {
                debug!(error = %e, "Reverse geocoding failed");
                None
            }
            Err(_) => {
                warn!(timeout_ms = self.params.geocode_timeout.as_millis() as u64, "Reverse geocoding timed out");
                None
            }
        }
    }

    pub async fn start_watching(&self) -> Result<WatchHandle, LocationError> {
        self.start_watching_with(self.params.watch_options()).await
    }

    /// Start streaming position updates to subscribers.
    ///
    /// Any watch already running on this tracker is stopped first.
    #[tracing::instrument(skip(self, options), fields(interval_ms = options.interval.as_millis() as u64))]
    pub async fn start_watching_with(&self, options: WatchOptions) -> Result<WatchHandle, LocationError> {
        if let Some(previous) = self.lock_watch().take() {
            previous.stop();
            debug!(watch_id = previous.id(), "Stopped previous watch");
        }

        if !self.request_permission(self.params.role).await.is_granted() {
            return Err(LocationError::PermissionDenied);
        }

        let stream = match self.provider.watch_position(options).await {
            Ok(stream) => stream,
            Err(LocationProviderError::PermissionRevoked) => {
                self.permission.lock().await.revoke();
                return Err(LocationError::PermissionDenied);
            }
            Err(e) => return Err(unavailable_from(e)),
        };

        let handle = WatchHandle::new(self.next_watch_id.fetch_add(1, Ordering::Relaxed));
        let task = tokio::spawn(forward_positions(stream, handle.clone(), Arc::clone(&self.shared)));
        handle.attach(task);

        // a concurrent start may have slipped in while we awaited the provider
        if let Some(other) = self.lock_watch().replace(handle.clone()) {
            other.stop();
        }
        info!(watch_id = handle.id(), "Started watching position");
        Ok(handle)
    }

    /// Stop a watch. Calling it again, or with an already replaced handle, is a no-op.
    ///
    /// Blocks until a fix being delivered to subscribers has been handed out, so it
    /// must not be called from inside a subscriber callback.
    pub fn stop_watching(&self, handle: &WatchHandle) {
        if handle.stop() {
            info!(watch_id = handle.id(), "Stopped watching position");
        }
        let mut active = self.lock_watch();
        if active.as_ref() == Some(handle) {
            *active = None;
        }
    }

    pub fn active_watch(&self) -> Option<WatchHandle> {
        self.lock_watch().clone()
    }

    /// Register a callback for every new fix.
    ///
    /// The current fix, if any, is replayed to the new subscriber right away.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LocationFix) + Send + Sync + 'static,
    {
        let callback: LocationCallback = Arc::new(callback);
        let subscription = self.shared.registry.insert(Arc::clone(&callback));
        if let Some(fix) = self.current_fix() {
            deliver(&callback, &fix);
        }
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.len()
    }

    /// Stop the active watch and drop every subscriber.
    pub fn shutdown(&self) {
        if let Some(handle) = self.lock_watch().take() {
            handle.stop();
        }
        self.shared.registry.clear();
        debug!("Location tracker shut down");
    }

    /// Last known fix, or a freshly published fallback when there never was a real one.
    fn last_or_fallback(&self) -> LocationFix {
        if let Some(fix) = self.current_fix() {
            return fix;
        }
        warn!(coordinate = %self.params.fallback_coordinate, "No location fix available, using fallback coordinate");
        let fix = LocationFix::fallback(self.params.fallback_coordinate, Utc::now().timestamp_millis());
        self.shared.publish(fix.clone());
        fix
    }

    fn lock_watch(&self) -> MutexGuard<'_, Option<WatchHandle>> {
        self.active_watch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_watch().take() {
            handle.stop();
        }
    }
}

async fn forward_positions(
    mut stream: mpsc::Receiver<DevicePosition>,
    handle: WatchHandle,
    shared: Arc<TrackerShared>,
) {
    while let Some(position) = stream.recv().await {
        let fix = LocationFix::from_device(position);
        if !handle.deliver_if_active(|| shared.publish(fix)) {
            break;
        }
    }
    debug!(watch_id = handle.id(), "Position stream closed");
}

fn unavailable_from(error: LocationProviderError) -> LocationError {
    let reason = match error {
        LocationProviderError::ServicesDisabled => UnavailableReason::ServicesDisabled,
        LocationProviderError::Timeout => UnavailableReason::Timeout,
        LocationProviderError::PermissionRevoked | LocationProviderError::Provider(_) => UnavailableReason::Unknown,
    };
    LocationError::unavailable(reason, error.to_string())
}
