use clap::Args;

use crate::types::constant::{
    DEFAULT_FALLBACK_LATITUDE, DEFAULT_FALLBACK_LONGITUDE, DEFAULT_FIX_TIMEOUT_MS, DEFAULT_GEOCODE_TIMEOUT_MS,
    DEFAULT_WATCH_INTERVAL_MS, DEFAULT_WATCH_MIN_DISTANCE_METERS,
};

/// Parameters of the location tracker.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct TrackingCliArgs {
    /// Role asking for location access: customer, contractor or driver.
    #[arg(env = "PICKUP_TRACKING_ROLE", long, default_value = "contractor")]
    pub tracking_role: String,

    /// How long to wait for a one-shot fix, in milliseconds.
    #[arg(env = "PICKUP_FIX_TIMEOUT_MS", long, default_value_t = DEFAULT_FIX_TIMEOUT_MS)]
    pub fix_timeout_ms: u64,

    /// Minimum time between watch updates, in milliseconds.
    #[arg(env = "PICKUP_WATCH_INTERVAL_MS", long, default_value_t = DEFAULT_WATCH_INTERVAL_MS)]
    pub watch_interval_ms: u64,

    /// Minimum movement between watch updates, in meters.
    #[arg(env = "PICKUP_WATCH_MIN_DISTANCE_METERS", long, default_value_t = DEFAULT_WATCH_MIN_DISTANCE_METERS)]
    pub watch_min_distance_meters: f64,

    /// Latitude used when no real fix was ever obtained.
    #[arg(
        env = "PICKUP_FALLBACK_LATITUDE",
        long,
        allow_negative_numbers = true,
        default_value_t = DEFAULT_FALLBACK_LATITUDE
    )]
    pub fallback_latitude: f64,

    /// Longitude used when no real fix was ever obtained.
    #[arg(
        env = "PICKUP_FALLBACK_LONGITUDE",
        long,
        allow_negative_numbers = true,
        default_value_t = DEFAULT_FALLBACK_LONGITUDE
    )]
    pub fallback_longitude: f64,

    /// Ask for balanced instead of high accuracy fixes.
    #[arg(env = "PICKUP_BALANCED_ACCURACY", long, default_value_t = false)]
    pub balanced_accuracy: bool,

    /// Do not reverse geocode one-shot fixes.
    #[arg(env = "PICKUP_SKIP_REVERSE_GEOCODE", long, default_value_t = false)]
    pub skip_reverse_geocode: bool,

    /// How long reverse geocoding may take before a fix is returned without an address, in milliseconds.
    #[arg(env = "PICKUP_GEOCODE_TIMEOUT_MS", long, default_value_t = DEFAULT_GEOCODE_TIMEOUT_MS)]
    pub geocode_timeout_ms: u64,
}
