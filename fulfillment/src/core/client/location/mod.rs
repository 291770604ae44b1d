pub mod error;

use async_trait::async_trait;
pub use error::LocationProviderError;
use tokio::sync::mpsc;

use crate::geo::Coordinate;
use crate::types::location::{Accuracy, DevicePosition, PermissionScope, PermissionStatus, WatchOptions};

/// A reverse geocoding candidate as returned by the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodedPlace {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// Platform location services: permissions, positions and geocoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceLocationProvider: Send + Sync {
    /// Current OS permission for `scope`, without prompting
    async fn permission_status(&self, scope: PermissionScope) -> Result<PermissionStatus, LocationProviderError>;

    /// Show the system prompt for `scope`
    async fn request_permission(&self, scope: PermissionScope) -> Result<PermissionStatus, LocationProviderError>;

    async fn services_enabled(&self) -> Result<bool, LocationProviderError>;

    /// One-shot position; may take arbitrarily long, callers apply their own timeout
    async fn current_position(&self, accuracy: Accuracy) -> Result<DevicePosition, LocationProviderError>;

    /// Start a position stream. The subscription ends when the receiver is dropped.
    async fn watch_position(
        &self,
        options: WatchOptions,
    ) -> Result<mpsc::Receiver<DevicePosition>, LocationProviderError>;

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodedPlace>, LocationProviderError>;

    /// Open the app's page in the system settings
    fn open_settings(&self) -> Result<(), LocationProviderError>;
}
