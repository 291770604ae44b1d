use thiserror::Error;

use crate::core::client::job_store::JobStoreError;
use crate::core::client::navigation::NavigationError;
use crate::error::location::{LocationError, UnavailableReason};
use crate::geo::geofence::distance_hint;
use crate::types::jobs::JobStatus;
use crate::workflow::evidence::PhotoSlot;
use crate::workflow::stage::Stage;

pub type FulfillmentResult<T> = Result<T, FulfillmentError>;

/// Failures of the fulfillment workflow.
///
/// Every variant leaves the session in the stage it was in before the event.
#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error("Location permission denied. Enable it from the system settings.")]
    PermissionDenied,

    #[error("Location unavailable ({reason}): {message}")]
    LocationUnavailable { reason: UnavailableReason, message: String },

    #[error("Not at the pickup location: {}", out_of_range_hint(.distance_meters, .threshold_meters))]
    OutOfRange { distance_meters: Option<f64>, threshold_meters: f64 },

    #[error("Disposal site search unavailable: {0}")]
    SiteSearchUnavailable(String),

    #[error("Failed to upload {slot} photo: {message}")]
    UploadFailed { slot: PhotoSlot, message: String },

    #[error("The {0} photo has not been captured yet")]
    MissingEvidence(PhotoSlot),

    #[error("Cannot {event} while the job is {stage}")]
    InvalidTransition { stage: Stage, event: &'static str },

    #[error("Disposal site {site_id:?} is not among the nearby sites")]
    SiteNotOffered { site_id: String },

    #[error("Failed to find job with id {id:?}")]
    JobNotFound { id: String },

    #[error("Job {id:?} is not assigned to contractor {contractor_id:?}")]
    NotAssigned { id: String, contractor_id: String },

    #[error("Invalid status {job_status} for job with id {id:?}. Cannot fulfill.")]
    InvalidStatus { id: String, job_status: JobStatus },

    #[error("Navigation unavailable: {0}")]
    NavigationUnavailable(#[from] NavigationError),

    #[error("Job store error: {0}")]
    Store(#[from] JobStoreError),

    #[error("Fulfillment error: {0}")]
    Other(String),
}

impl FulfillmentError {
    /// Whether the contractor can fix the situation and try the same action again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FulfillmentError::JobNotFound { .. }
                | FulfillmentError::NotAssigned { .. }
                | FulfillmentError::InvalidStatus { .. }
                | FulfillmentError::Other(_)
        )
    }

    /// Short actionable message for the contractor.
    pub fn user_message(&self) -> String {
        match self {
            FulfillmentError::PermissionDenied => {
                "Location access is off. Open Settings and allow location access to continue.".to_string()
            }
            FulfillmentError::LocationUnavailable { reason: UnavailableReason::ServicesDisabled, .. } => {
                "Location services are disabled. Turn them on and try again.".to_string()
            }
            FulfillmentError::LocationUnavailable { .. } => {
                "Could not determine your location. Move to an open area and try again.".to_string()
            }
            FulfillmentError::OutOfRange { distance_meters, threshold_meters } => {
                distance_hint(*distance_meters, *threshold_meters)
            }
            FulfillmentError::SiteSearchUnavailable(_) => {
                "Could not load nearby disposal sites. Check your connection and try again.".to_string()
            }
            FulfillmentError::UploadFailed { .. } => {
                "Photo upload failed. Your photos are kept, try again when you have a connection.".to_string()
            }
            FulfillmentError::MissingEvidence(slot) => format!("Take the {} photo first.", slot),
            other => other.to_string(),
        }
    }
}

fn out_of_range_hint(distance_meters: &Option<f64>, threshold_meters: &f64) -> String {
    distance_hint(*distance_meters, *threshold_meters)
}

impl From<LocationError> for FulfillmentError {
    fn from(value: LocationError) -> Self {
        match value {
            LocationError::PermissionDenied => FulfillmentError::PermissionDenied,
            LocationError::Unavailable { reason, message } => FulfillmentError::LocationUnavailable { reason, message },
        }
    }
}
