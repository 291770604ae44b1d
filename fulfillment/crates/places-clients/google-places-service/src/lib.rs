pub mod client;
pub mod constants;
pub mod error;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use fulfillment_places_client_interface::{NearbySearchRequest, Place, PlaceLocation, PlacesClient, PlacesClientError};
use url::Url;

use crate::client::GooglePlacesClient;
use crate::error::GooglePlacesError;
use crate::types::PlaceResult;

#[derive(Debug, Clone)]
pub struct GooglePlacesValidatedArgs {
    pub api_key: String,
    pub base_url: Url,
    pub request_timeout: Duration,
}

/// Google Places backed implementation of [`PlacesClient`].
pub struct GooglePlacesService {
    pub client: GooglePlacesClient,
}

impl GooglePlacesService {
    pub fn new_with_args(args: &GooglePlacesValidatedArgs) -> Result<Self, GooglePlacesError> {
        let client = GooglePlacesClient::new(args.base_url.clone(), args.api_key.clone(), args.request_timeout)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesService {
    #[tracing::instrument(
        skip(self, request),
        fields(radius_meters = request.radius_meters, keyword = %request.keyword)
    )]
    async fn nearby_search(&self, request: NearbySearchRequest) -> Result<Vec<Place>, PlacesClientError> {
        let response = self
            .client
            .nearby_search(request.location, request.radius_meters, &request.keyword)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error_type = e.error_type(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Nearby search failed"
                )
            })?;

        if !response.status.is_success() {
            let err = GooglePlacesError::RequestRejected {
                operation: "nearby_search".to_string(),
                status: response.status.to_string(),
                message: response.error_message.unwrap_or_else(|| "no error message returned".to_string()),
            };
            tracing::warn!(error_type = err.error_type(), error = %err, "Nearby search rejected");
            return Err(err.into());
        }

        if response.next_page_token.is_some() {
            tracing::debug!("Ignoring additional result pages");
        }

        let places: Vec<Place> = response.results.into_iter().map(into_place).collect();
        tracing::info!(status = %response.status, count = places.len(), "Nearby search completed");
        Ok(places)
    }
}

fn into_place(result: PlaceResult) -> Place {
    Place {
        id: result.place_id,
        name: result.name,
        location: PlaceLocation { latitude: result.geometry.location.lat, longitude: result.geometry.location.lng },
        vicinity: result.vicinity,
        rating: result.rating,
    }
}
