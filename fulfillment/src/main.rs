use chrono::Utc;
use clap::Parser as _;
use dotenvy::dotenv;
use fulfillment_google_places_service::GooglePlacesValidatedArgs;
use pickup_fulfillment::cli::{Cli, Commands, ConfigCmd, GeofenceCmd, SitesCmd};
use pickup_fulfillment::core::config::Config;
use pickup_fulfillment::geo::{initial_bearing_degrees, Coordinate, Geofence, GeofenceReading};
use pickup_fulfillment::sites::find_nearby_sites;
use pickup_fulfillment::types::location::{DevicePosition, LocationFix};
use pickup_fulfillment::types::params::{FulfillmentParams, TrackingParams};
use pickup_fulfillment::workflow::navigation::RoutePlan;
use pickup_fulfillment::EngineResult;
use serde::Serialize;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    pickup_fulfillment::utils::logging::init_logging()?;
    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    let result = match &cli.command {
        Commands::Sites { sites_command } => run_sites(sites_command).await,
        Commands::Geofence { geofence_command } => run_geofence(geofence_command),
        Commands::Config { config_command } => show_config(config_command),
    };

    if let Err(e) = &result {
        error!(error = %e, error_chain = ?e, "Command failed");
    }
    Ok(result?)
}

async fn run_sites(cmd: &SitesCmd) -> EngineResult<()> {
    let params = FulfillmentParams::try_from(cmd.fulfillment_args.clone())?;
    let places_args = GooglePlacesValidatedArgs::try_from(cmd.places_args.clone())?;
    let places = Config::build_places_client(&places_args)?;
    let origin = Coordinate::new(cmd.latitude, cmd.longitude)?;

    info!(%origin, radius_meters = params.site_search_radius_meters, "Searching disposal sites");
    let sites =
        find_nearby_sites(places.as_ref(), &origin, &params.site_keyword, params.site_search_radius_meters).await?;
    emit(&sites)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeofenceReport {
    reading: GeofenceReading,
    remaining_meters: Option<f64>,
    bearing_degrees: f64,
    hint: String,
    route: RoutePlan,
    navigation_url: String,
}

fn run_geofence(cmd: &GeofenceCmd) -> EngineResult<()> {
    let params = FulfillmentParams::try_from(cmd.fulfillment_args.clone())?;
    let contractor = Coordinate::new(cmd.from_latitude, cmd.from_longitude)?;
    let pickup = Coordinate::new(cmd.to_latitude, cmd.to_longitude)?;

    let fix = LocationFix::from_device(DevicePosition {
        coordinate: contractor,
        accuracy_meters: None,
        timestamp_ms: Utc::now().timestamp_millis(),
    });
    let reading = Geofence::new(params.arrival_threshold_meters).evaluate(Some(&fix), Some(&pickup));
    let route = RoutePlan::new(Some(contractor), pickup);
    let navigation_url = route
        .navigation_url(params.navigation_platform)
        .map_err(|e| pickup_fulfillment::EngineError::ConfigError(format!("Invalid navigation url: {e}")))?;

    emit(&GeofenceReport {
        reading,
        remaining_meters: reading.remaining_meters(),
        bearing_degrees: initial_bearing_degrees(&contractor, &pickup),
        hint: reading.hint(),
        navigation_url: navigation_url.to_string(),
        route,
    })
}

#[derive(Serialize)]
struct ConfigReport {
    tracking: TrackingParams,
    fulfillment: FulfillmentParams,
}

fn show_config(cmd: &ConfigCmd) -> EngineResult<()> {
    let report = ConfigReport {
        tracking: TrackingParams::try_from(cmd.tracking_args.clone())?,
        fulfillment: FulfillmentParams::try_from(cmd.fulfillment_args.clone())?,
    };
    emit(&report)
}

#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> EngineResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
