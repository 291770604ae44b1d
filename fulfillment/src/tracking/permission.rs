use tracing::{debug, info, warn};

use crate::core::client::location::DeviceLocationProvider;
use crate::types::location::{PermissionScope, PermissionState, PermissionStatus, RoleHint};

/// Permission state cached by a tracker between requests
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PermissionCache {
    pub state: PermissionState,
    /// Background elevation is only attempted once per grant
    pub background_attempted: bool,
}

impl PermissionCache {
    fn is_settled_for(&self, role: RoleHint) -> bool {
        match self.state {
            PermissionState::BackgroundGranted => true,
            PermissionState::Granted => !role.requires_background() || self.background_attempted,
            PermissionState::Undetermined | PermissionState::Denied => false,
        }
    }

    /// The OS took the permission away behind our back
    pub fn revoke(&mut self) {
        self.state = PermissionState::Denied;
        self.background_attempted = false;
    }
}

/// Bring `cache` up to date with the OS, prompting only where the OS still allows it.
pub(crate) async fn negotiate(
    provider: &dyn DeviceLocationProvider,
    cache: &mut PermissionCache,
    role: RoleHint,
) -> PermissionState {
    if cache.is_settled_for(role) {
        return cache.state;
    }

    if !cache.state.is_granted() {
        let status = match provider.permission_status(PermissionScope::Foreground).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not read foreground permission status, prompting instead");
                PermissionStatus::Undetermined
            }
        };
        let status = match status {
            PermissionStatus::Granted => PermissionStatus::Granted,
            PermissionStatus::Undetermined => {
                info!(%role, "Requesting foreground location permission");
                prompt(provider, PermissionScope::Foreground).await
            }
            PermissionStatus::Denied => {
                // the system prompt is not shown again once denied
                warn!(%role, "Location permission denied, it can only be re-enabled from the system settings");
                PermissionStatus::Denied
            }
        };
        if status != PermissionStatus::Granted {
            cache.revoke();
            return cache.state;
        }
        cache.state = PermissionState::Granted;
        cache.background_attempted = false;
    }

    if role.requires_background() && !cache.background_attempted {
        cache.background_attempted = true;
        let status = match provider.permission_status(PermissionScope::Background).await {
            Ok(PermissionStatus::Undetermined) => {
                info!(%role, "Requesting background location permission");
                prompt(provider, PermissionScope::Background).await
            }
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not read background permission status");
                PermissionStatus::Denied
            }
        };
        if status == PermissionStatus::Granted {
            cache.state = PermissionState::BackgroundGranted;
        } else {
            debug!(%role, "Background location not granted, continuing with foreground tracking only");
        }
    }

    cache.state
}

async fn prompt(provider: &dyn DeviceLocationProvider, scope: PermissionScope) -> PermissionStatus {
    provider.request_permission(scope).await.unwrap_or_else(|e| {
        warn!(%scope, error = %e, "Permission prompt failed");
        PermissionStatus::Denied
    })
}
