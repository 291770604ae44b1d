use serde::Deserialize;

/// Top level status reported inside every places API payload.
///
/// The HTTP status is 200 for most failures, so this is the field that decides success.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

impl PlacesStatus {
    /// `OK` and `ZERO_RESULTS` both mean the search itself went through.
    pub fn is_success(&self) -> bool {
        matches!(self, PlacesStatus::Ok | PlacesStatus::ZeroResults)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    pub status: PlacesStatus,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    pub geometry: PlaceGeometry,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceGeometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
