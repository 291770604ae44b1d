use std::time::Duration;

use fulfillment_places_client_interface::PlaceLocation;
use tracing::debug;
use url::Url;

use crate::constants::NEARBY_SEARCH_PATH;
use crate::error::GooglePlacesError;
use crate::types::NearbySearchResponse;

/// Thin async wrapper over the Google Places web service
pub struct GooglePlacesClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(base_url: Url, api_key: impl Into<String>, timeout: Duration) -> Result<Self, GooglePlacesError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| GooglePlacesError::Other {
            operation: "build_client".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { client, base_url, api_key: api_key.into() })
    }

    /// Run a nearby search and return the raw first page.
    ///
    /// Failure statuses inside a 200 response are *not* turned into errors here,
    /// the caller decides how to treat them.
    pub async fn nearby_search(
        &self,
        location: PlaceLocation,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<NearbySearchResponse, GooglePlacesError> {
        let url = self.base_url.join(NEARBY_SEARCH_PATH).map_err(|e| GooglePlacesError::UrlError {
            operation: "nearby_search".to_string(),
            message: e.to_string(),
        })?;

        debug!(radius_meters, keyword, "Sending nearby search request");
        let response = self
            .client
            .get(url)
            .query(&[
                ("location", format!("{},{}", location.latitude, location.longitude)),
                ("radius", radius_meters.to_string()),
                ("keyword", keyword.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| GooglePlacesError::from_reqwest_error("nearby_search", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GooglePlacesError::api_error("nearby_search", status, body));
        }

        response.json::<NearbySearchResponse>().await.map_err(|e| GooglePlacesError::ParseError {
            operation: "nearby_search".to_string(),
            message: e.to_string(),
        })
    }
}
