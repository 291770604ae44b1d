use serde::Serialize;
use thiserror::Error;

/// Why a fix could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnavailableReason {
    Timeout,
    ServicesDisabled,
    Unknown,
}

/// Errors produced by the location tracking engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied. Enable it from the system settings.")]
    PermissionDenied,

    #[error("Location unavailable ({reason}): {message}")]
    Unavailable { reason: UnavailableReason, message: String },
}

impl LocationError {
    pub fn unavailable(reason: UnavailableReason, message: impl Into<String>) -> Self {
        LocationError::Unavailable { reason, message: message.into() }
    }
}
