use serde::{Deserialize, Serialize};

/// Lifecycle status of a job as persisted in the job record store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, strum_macros::Display, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    /// Requested by a customer, no contractor yet
    Scheduled,
    /// A contractor accepted the job and is expected on site
    Assigned,
    /// The contractor confirmed arrival at the pickup
    InProgress,
    /// Waste loaded, evidence uploaded, on the way to a disposal site
    PickedUp,
    /// Waste disposed. Nothing else happens to the job
    Completed,
    /// Cancelled upstream
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}
