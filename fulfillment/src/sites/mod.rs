use fulfillment_places_client_interface::{NearbySearchRequest, Place, PlaceLocation, PlacesClient};
use tracing::{info, warn};

use crate::error::fulfillment::FulfillmentError;
use crate::geo::{distance_meters, Coordinate};
use crate::types::site::DisposalSite;

/// Query the places provider around `origin` and rank the results by distance.
///
/// Only the first page is used. No results is an empty list; an error only
/// means the provider itself could not be queried.
#[tracing::instrument(skip(places, origin), fields(origin = %origin))]
pub async fn find_nearby_sites(
    places: &dyn PlacesClient,
    origin: &Coordinate,
    keyword: &str,
    radius_meters: u32,
) -> Result<Vec<DisposalSite>, FulfillmentError> {
    let request = NearbySearchRequest::new(
        PlaceLocation { latitude: origin.latitude(), longitude: origin.longitude() },
        radius_meters,
        keyword,
    );

    let results = places.nearby_search(request).await.map_err(|e| {
        warn!(error = %e, retryable = e.is_retryable(), "Disposal site search failed");
        FulfillmentError::SiteSearchUnavailable(e.to_string())
    })?;

    let sites = rank_sites(origin, results);
    info!(count = sites.len(), "Ranked nearby disposal sites");
    Ok(sites)
}

/// Decorate places with their distance from `origin` and sort them, nearest first.
///
/// Equal distances keep the provider's order.
pub fn rank_sites(origin: &Coordinate, places: Vec<Place>) -> Vec<DisposalSite> {
    let mut sites: Vec<DisposalSite> = places
        .into_iter()
        .filter_map(|place| {
            let coordinate = match Coordinate::new(place.location.latitude, place.location.longitude) {
                Ok(coordinate) => coordinate,
                Err(e) => {
                    warn!(place_id = %place.id, error = %e, "Skipping place with invalid coordinate");
                    return None;
                }
            };
            Some(DisposalSite {
                distance_meters: distance_meters(origin, &coordinate),
                id: place.id,
                name: place.name,
                coordinate,
                vicinity_text: place.vicinity,
                rating: place.rating,
            })
        })
        .collect();

    // sort_by is stable
    sites.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    sites
}
