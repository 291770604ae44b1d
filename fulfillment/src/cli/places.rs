use clap::Args;
use fulfillment_google_places_service::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, GOOGLE_MAPS_API_BASE_URL};
use url::Url;

/// Parameters used to config the Google Places client.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct GooglePlacesCliArgs {
    /// The API key for the Google Places web service.
    #[arg(env = "PICKUP_GOOGLE_PLACES_API_KEY", long)]
    pub google_places_api_key: String,

    /// Base URL of the Google Maps web services.
    #[arg(env = "PICKUP_GOOGLE_PLACES_URL", long, default_value = GOOGLE_MAPS_API_BASE_URL)]
    pub google_places_url: Url,

    /// Request timeout in seconds.
    #[arg(env = "PICKUP_GOOGLE_PLACES_TIMEOUT_SECS", long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub google_places_timeout_secs: u64,
}
