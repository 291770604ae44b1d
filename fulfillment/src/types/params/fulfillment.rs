use std::str::FromStr;

use serde::Serialize;

use crate::cli::fulfillment::FulfillmentCliArgs;
use crate::error::EngineError;
use crate::geo::geofence::DEFAULT_ARRIVAL_THRESHOLD_METERS;
use crate::types::constant::{DEFAULT_SITE_KEYWORD, DEFAULT_SITE_SEARCH_RADIUS_METERS};
use crate::workflow::navigation::NavigationPlatform;

/// Validated settings of the fulfillment workflow
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentParams {
    pub arrival_threshold_meters: f64,
    pub site_search_radius_meters: u32,
    pub site_keyword: String,
    pub navigation_platform: NavigationPlatform,
}

impl Default for FulfillmentParams {
    fn default() -> Self {
        Self {
            arrival_threshold_meters: DEFAULT_ARRIVAL_THRESHOLD_METERS,
            site_search_radius_meters: DEFAULT_SITE_SEARCH_RADIUS_METERS,
            site_keyword: DEFAULT_SITE_KEYWORD.to_string(),
            navigation_platform: NavigationPlatform::Web,
        }
    }
}

impl TryFrom<FulfillmentCliArgs> for FulfillmentParams {
    type Error = EngineError;

    fn try_from(args: FulfillmentCliArgs) -> Result<Self, Self::Error> {
        if args.arrival_threshold_meters.is_nan() || args.arrival_threshold_meters <= 0.0 {
            return Err(EngineError::ConfigError(format!(
                "Arrival threshold must be positive, got {}",
                args.arrival_threshold_meters
            )));
        }
        if args.site_search_radius_meters == 0 {
            return Err(EngineError::ConfigError("Site search radius must be greater than zero".to_string()));
        }
        if args.site_keyword.trim().is_empty() {
            return Err(EngineError::ConfigError("Site search keyword must not be empty".to_string()));
        }
        let navigation_platform = NavigationPlatform::from_str(&args.navigation_platform).map_err(|_| {
            EngineError::ConfigError(format!("Unknown navigation platform: {}", args.navigation_platform))
        })?;

        Ok(Self {
            arrival_threshold_meters: args.arrival_threshold_meters,
            site_search_radius_meters: args.site_search_radius_meters,
            site_keyword: args.site_keyword,
            navigation_platform,
        })
    }
}
