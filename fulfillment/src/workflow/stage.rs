use serde::Serialize;

use crate::types::jobs::JobStatus;

/// Where a fulfillment session currently is.
///
/// `Arrived` is transient: arrival is confirmed and the job moves straight on to `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Assigned,
    Arrived,
    InProgress,
    PickedUp,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FulfillmentEvent {
    BeginNavigation,
    ConfirmArrival,
    CaptureBeforePhoto,
    CaptureAfterPhoto,
    ConfirmPickup,
    ListNearbySites,
    SelectDisposalSite,
}

impl Stage {
    /// Stage a session resumes at for a persisted job status, `None` if the job cannot be worked on.
    pub fn from_job_status(status: JobStatus) -> Option<Stage> {
        match status {
            JobStatus::Assigned => Some(Stage::Assigned),
            JobStatus::InProgress => Some(Stage::InProgress),
            JobStatus::PickedUp => Some(Stage::PickedUp),
            JobStatus::Scheduled | JobStatus::Completed | JobStatus::Cancelled => None,
        }
    }

    /// Stage reached when `event` succeeds from `self`, `None` if the event is not allowed here.
    pub fn next(self, event: FulfillmentEvent) -> Option<Stage> {
        use FulfillmentEvent::*;
        match (self, event) {
            (Stage::Assigned, BeginNavigation) => Some(Stage::Assigned),
            (Stage::Assigned, ConfirmArrival) => Some(Stage::Arrived),
            (Stage::Arrived | Stage::InProgress, CaptureBeforePhoto) => Some(Stage::InProgress),
            (Stage::InProgress, CaptureAfterPhoto) => Some(Stage::InProgress),
            (Stage::InProgress, ConfirmPickup) => Some(Stage::PickedUp),
            (Stage::PickedUp, ListNearbySites) => Some(Stage::PickedUp),
            (Stage::PickedUp, SelectDisposalSite) => Some(Stage::Completed),
            _ => None,
        }
    }

    /// Whether the arrival guard is live in this stage
    pub fn tracks_arrival(&self) -> bool {
        matches!(self, Stage::Assigned | Stage::Arrived)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}
