use clap::{Parser, Subcommand};

use self::fulfillment::FulfillmentCliArgs;
use self::places::GooglePlacesCliArgs;
use self::tracking::TrackingCliArgs;

pub mod fulfillment;
pub mod places;
pub mod tracking;

#[derive(Parser, Debug)]
#[command(
    name = "pickup-fulfillment",
    about = "Operator tools for the contractor pickup fulfillment engine",
    after_help = "Examples:\n  \
    pickup-fulfillment sites --latitude 33.749 --longitude -84.388\n  \
    pickup-fulfillment geofence --from-latitude 33.749 --from-longitude -84.388 \
    --to-latitude 33.7491 --to-longitude -84.3881\n  \
    pickup-fulfillment config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank disposal sites around a position, nearest first
    Sites {
        #[command(flatten)]
        sites_command: Box<SitesCmd>,
    },
    /// Check a contractor position against the arrival geofence of a pickup
    Geofence {
        #[command(flatten)]
        geofence_command: Box<GeofenceCmd>,
    },
    /// Print the effective tracking and workflow configuration
    Config {
        #[command(flatten)]
        config_command: Box<ConfigCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct SitesCmd {
    /// Latitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    #[clap(flatten)]
    pub fulfillment_args: FulfillmentCliArgs,

    #[clap(flatten)]
    pub places_args: GooglePlacesCliArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct GeofenceCmd {
    /// Latitude of the contractor
    #[arg(long, allow_negative_numbers = true)]
    pub from_latitude: f64,

    /// Longitude of the contractor
    #[arg(long, allow_negative_numbers = true)]
    pub from_longitude: f64,

    /// Latitude of the pickup
    #[arg(long, allow_negative_numbers = true)]
    pub to_latitude: f64,

    /// Longitude of the pickup
    #[arg(long, allow_negative_numbers = true)]
    pub to_longitude: f64,

    #[clap(flatten)]
    pub fulfillment_args: FulfillmentCliArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigCmd {
    #[clap(flatten)]
    pub tracking_args: TrackingCliArgs,

    #[clap(flatten)]
    pub fulfillment_args: FulfillmentCliArgs,
}
