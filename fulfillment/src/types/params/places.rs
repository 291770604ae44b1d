use std::time::Duration;

use fulfillment_google_places_service::GooglePlacesValidatedArgs;

use crate::cli::places::GooglePlacesCliArgs;
use crate::error::EngineError;

impl TryFrom<GooglePlacesCliArgs> for GooglePlacesValidatedArgs {
    type Error = EngineError;

    fn try_from(args: GooglePlacesCliArgs) -> Result<Self, Self::Error> {
        if args.google_places_api_key.trim().is_empty() {
            return Err(EngineError::ConfigError("Google Places API key must not be empty".to_string()));
        }
        Ok(Self {
            api_key: args.google_places_api_key,
            base_url: args.google_places_url,
            request_timeout: Duration::from_secs(args.google_places_timeout_secs),
        })
    }
}
