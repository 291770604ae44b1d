/// Public endpoint of the Google Maps web services
pub const GOOGLE_MAPS_API_BASE_URL: &str = "https://maps.googleapis.com";

/// Path of the nearby search endpoint, relative to the API base url
pub(crate) const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Default timeout applied to every request made to the places API
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
