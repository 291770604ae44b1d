pub mod fulfillment;
pub mod location;

use fulfillment_google_places_service::error::GooglePlacesError;
use thiserror::Error;

use crate::geo::GeoError;
pub use fulfillment::{FulfillmentError, FulfillmentResult};
pub use location::{LocationError, UnavailableReason};

/// Result type for engine level operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Error types surfaced by the binary and engine wiring
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Fulfillment error: {0}")]
    FulfillmentError(#[from] FulfillmentError),

    #[error("Google Places error: {0}")]
    GooglePlacesError(#[from] GooglePlacesError),

    #[error("Invalid coordinate: {0}")]
    GeoError(#[from] GeoError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
