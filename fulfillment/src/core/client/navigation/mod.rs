use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("No application can open {0}")]
    Unsupported(String),

    #[error("Failed to open navigation: {0}")]
    LaunchFailed(String),
}

/// Hands a navigation URL to the platform's turn-by-turn application
#[cfg_attr(test, mockall::automock)]
pub trait NavigationLauncher: Send + Sync {
    fn launch(&self, url: &Url) -> Result<(), NavigationError>;
}
