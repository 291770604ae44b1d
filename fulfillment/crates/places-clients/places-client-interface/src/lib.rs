use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Places client provides an abstraction over point-of-interest search services that do the
/// following:
/// - Accept a centre location, a search radius and a free-text keyword
/// - Return the first page of matching places with their position and a short address
///
/// Only the first page is ever requested. Ranking and filtering happen in the caller.
#[automock]
#[async_trait]
pub trait PlacesClient: Send + Sync {
    async fn nearby_search(&self, request: NearbySearchRequest) -> Result<Vec<Place>, PlacesClientError>;
}

/// A plain latitude/longitude pair as reported by the places provider.
///
/// Values are passed through untouched; callers validate them before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    pub location: PlaceLocation,
    pub radius_meters: u32,
    pub keyword: String,
}

impl NearbySearchRequest {
    pub fn new(location: PlaceLocation, radius_meters: u32, keyword: impl Into<String>) -> Self {
        Self { location, radius_meters, keyword: keyword.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub location: PlaceLocation,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlacesClientError {
    #[error("Places provider unreachable: {0}")]
    Transport(String),
    #[error("Places provider rejected credentials: {0}")]
    Unauthorized(String),
    #[error("Places provider returned {status}: {message}")]
    Provider { status: String, message: String },
    #[error("Places provider response could not be parsed: {0}")]
    InvalidResponse(String),
    #[error("Internal places client error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl PlacesClientError {
    /// Whether the same request could succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlacesClientError::Transport(_))
    }
}
