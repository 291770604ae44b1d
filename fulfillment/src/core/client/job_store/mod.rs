pub mod error;

use async_trait::async_trait;
pub use error::JobStoreError;

use crate::types::jobs::{Job, JobUpdates};

/// Trait defining the job record operations the fulfillment workflow needs.
///
/// Jobs are created and deleted elsewhere, this side only reads and updates them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRecordStore: Send + Sync {
    /// Fetch a job by id
    async fn get_job(&self, id: &str) -> Result<Option<Job>, JobStoreError>;

    /// Apply `updates` to `current` and return the job as stored afterwards
    async fn update_job(&self, current: &Job, updates: JobUpdates) -> Result<Job, JobStoreError>;

    /// The job a contractor is working on, i.e. in `in_progress` or `picked_up`
    async fn get_active_job_for_contractor(&self, contractor_id: &str) -> Result<Option<Job>, JobStoreError>;
}
