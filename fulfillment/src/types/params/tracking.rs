use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::cli::tracking::TrackingCliArgs;
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::types::constant::{
    DEFAULT_FALLBACK_LATITUDE, DEFAULT_FALLBACK_LONGITUDE, DEFAULT_FIX_TIMEOUT_MS, DEFAULT_GEOCODE_TIMEOUT_MS,
    DEFAULT_WATCH_INTERVAL_MS, DEFAULT_WATCH_MIN_DISTANCE_METERS,
};
use crate::types::location::{Accuracy, RoleHint, WatchOptions};

/// Validated settings of a location tracker
#[derive(Debug, Clone, Serialize)]
pub struct TrackingParams {
    pub role: RoleHint,
    pub fix_timeout: Duration,
    pub accuracy: Accuracy,
    pub watch_interval: Duration,
    pub watch_min_distance_meters: f64,
    pub fallback_coordinate: Coordinate,
    pub reverse_geocode_fixes: bool,
    pub geocode_timeout: Duration,
}

impl TrackingParams {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            accuracy: self.accuracy,
            interval: self.watch_interval,
            min_distance_meters: self.watch_min_distance_meters,
        }
    }
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            role: RoleHint::Contractor,
            fix_timeout: Duration::from_millis(DEFAULT_FIX_TIMEOUT_MS),
            accuracy: Accuracy::High,
            watch_interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            watch_min_distance_meters: DEFAULT_WATCH_MIN_DISTANCE_METERS,
            fallback_coordinate: Coordinate::new_unchecked(DEFAULT_FALLBACK_LATITUDE, DEFAULT_FALLBACK_LONGITUDE),
            reverse_geocode_fixes: true,
            geocode_timeout: Duration::from_millis(DEFAULT_GEOCODE_TIMEOUT_MS),
        }
    }
}

impl TryFrom<TrackingCliArgs> for TrackingParams {
    type Error = EngineError;

    fn try_from(args: TrackingCliArgs) -> Result<Self, Self::Error> {
        let role = RoleHint::from_str(&args.tracking_role)
            .map_err(|_| EngineError::ConfigError(format!("Unknown tracking role: {}", args.tracking_role)))?;
        if args.fix_timeout_ms == 0 {
            return Err(EngineError::ConfigError("Fix timeout must be greater than zero".to_string()));
        }
        if args.geocode_timeout_ms == 0 {
            return Err(EngineError::ConfigError("Geocode timeout must be greater than zero".to_string()));
        }
        if args.watch_min_distance_meters.is_nan() || args.watch_min_distance_meters < 0.0 {
            return Err(EngineError::ConfigError(format!(
                "Watch minimum distance must be non-negative, got {}",
                args.watch_min_distance_meters
            )));
        }
        let fallback_coordinate = Coordinate::new(args.fallback_latitude, args.fallback_longitude)?;

        Ok(Self {
            role,
            fix_timeout: Duration::from_millis(args.fix_timeout_ms),
            accuracy: if args.balanced_accuracy { Accuracy::Balanced } else { Accuracy::High },
            watch_interval: Duration::from_millis(args.watch_interval_ms),
            watch_min_distance_meters: args.watch_min_distance_meters,
            fallback_coordinate,
            reverse_geocode_fixes: !args.skip_reverse_geocode,
            geocode_timeout: Duration::from_millis(args.geocode_timeout_ms),
        })
    }
}
