use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::types::constant::{DEFAULT_WATCH_INTERVAL_MS, DEFAULT_WATCH_MIN_DISTANCE_METERS};

/// Raw position as reported by the device provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePosition {
    pub coordinate: Coordinate,
    pub accuracy_meters: Option<f64>,
    pub timestamp_ms: i64,
}

/// A position held by the tracking engine.
///
/// Fixes are never mutated, each one supersedes the previous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub accuracy_meters: Option<f64>,
    pub captured_at_ms: i64,
    /// Set when the configured default coordinate stands in for a real fix
    pub is_fallback: bool,
    pub address: Option<Address>,
}

impl LocationFix {
    pub fn from_device(position: DevicePosition) -> Self {
        Self {
            coordinate: position.coordinate,
            accuracy_meters: position.accuracy_meters,
            captured_at_ms: position.timestamp_ms,
            is_fallback: false,
            address: None,
        }
    }

    pub fn fallback(coordinate: Coordinate, captured_at_ms: i64) -> Self {
        Self { coordinate, accuracy_meters: None, captured_at_ms, is_fallback: true, address: None }
    }

    pub fn with_address(mut self, address: Option<Address>) -> Self {
        self.address = address;
        self
    }
}

/// Reverse geocoded postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub formatted_address: String,
}

impl Address {
    pub fn new(
        street: Option<String>,
        city: Option<String>,
        region: Option<String>,
        country: Option<String>,
        postal_code: Option<String>,
    ) -> Self {
        let formatted_address = [&street, &city, &region, &postal_code]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self { street, city, region, country, postal_code, formatted_address }
    }
}

/// Accuracy requested from the device provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Accuracy {
    Balanced,
    #[default]
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub accuracy: Accuracy,
    pub interval: Duration,
    pub min_distance_meters: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            min_distance_meters: DEFAULT_WATCH_MIN_DISTANCE_METERS,
        }
    }
}

/// Permission state held by the tracking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Undetermined,
    Granted,
    /// Foreground plus background tracking, only requested for tracking roles
    BackgroundGranted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted | PermissionState::BackgroundGranted)
    }
}

/// Permission answer of the operating system for a single scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PermissionScope {
    Foreground,
    Background,
}

/// Who is asking for location access. Tracking roles also want background updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RoleHint {
    Customer,
    Contractor,
    Driver,
}

impl RoleHint {
    pub fn requires_background(&self) -> bool {
        matches!(self, RoleHint::Contractor | RoleHint::Driver)
    }
}
