use clap::Args;

use crate::geo::geofence::DEFAULT_ARRIVAL_THRESHOLD_METERS;
use crate::types::constant::{DEFAULT_SITE_KEYWORD, DEFAULT_SITE_SEARCH_RADIUS_METERS};

/// Parameters of the fulfillment workflow.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct FulfillmentCliArgs {
    /// Distance from the pickup, in meters, within which arrival can be confirmed.
    #[arg(env = "PICKUP_ARRIVAL_THRESHOLD_METERS", long, default_value_t = DEFAULT_ARRIVAL_THRESHOLD_METERS)]
    pub arrival_threshold_meters: f64,

    /// Radius of the disposal site search, in meters.
    #[arg(env = "PICKUP_SITE_SEARCH_RADIUS_METERS", long, default_value_t = DEFAULT_SITE_SEARCH_RADIUS_METERS)]
    pub site_search_radius_meters: u32,

    /// Keyword sent to the places provider when searching for disposal sites.
    #[arg(env = "PICKUP_SITE_KEYWORD", long, default_value = DEFAULT_SITE_KEYWORD)]
    pub site_keyword: String,

    /// Navigation app flavour: ios, android or web.
    #[arg(env = "PICKUP_NAVIGATION_PLATFORM", long, default_value = "web")]
    pub navigation_platform: String,
}
