use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationProviderError {
    #[error("Location services are disabled")]
    ServicesDisabled,

    #[error("Location permission was revoked")]
    PermissionRevoked,

    #[error("Location provider timed out")]
    Timeout,

    #[error("Location provider error: {0}")]
    Provider(String),
}
