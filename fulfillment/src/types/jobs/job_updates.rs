use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::fulfillment::FulfillmentError;
use crate::geo::Coordinate;
use crate::types::jobs::job_item::DisposalRecord;
use crate::types::jobs::types::JobStatus;

/// URLs of the uploaded before/after evidence of a pickup
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PickupPhotos {
    pub before: String,
    pub after: String,
}

/// Defining a structure that contains the changes to be made in the job object,
/// id and pickup coordinate are not allowed to be changed
// updated_at is always set by the store when it applies this object
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct JobUpdates {
    pub status: Option<JobStatus>,
    /// `Some(None)` clears the field
    pub picked_up_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub contractor_location: Option<Coordinate>,
    pub pickup_photos: Option<PickupPhotos>,
    pub disposal_site: Option<DisposalRecord>,
    pub dump_photo: Option<String>,
    pub dumped_by: Option<String>,
}

impl JobUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_status(mut self, status: JobStatus) -> JobUpdates {
        self.status = Some(status);
        self
    }
    pub fn update_picked_up_at(mut self, at: DateTime<Utc>) -> JobUpdates {
        self.picked_up_at = Some(Some(at));
        self
    }
    pub fn clear_picked_up_at(mut self) -> JobUpdates {
        self.picked_up_at = Some(None);
        self
    }
    pub fn update_completed_at(mut self, at: DateTime<Utc>) -> JobUpdates {
        self.completed_at = Some(at);
        self
    }
    pub fn update_contractor_location(mut self, coordinate: Coordinate) -> JobUpdates {
        self.contractor_location = Some(coordinate);
        self
    }
    pub fn update_pickup_photos(mut self, before: String, after: String) -> JobUpdates {
        self.pickup_photos = Some(PickupPhotos { before, after });
        self
    }
    pub fn update_disposal_site(mut self, record: DisposalRecord) -> JobUpdates {
        self.disposal_site = Some(record);
        self
    }
    pub fn update_dump_photo(mut self, url: String) -> JobUpdates {
        self.dump_photo = Some(url);
        self
    }
    pub fn update_dumped_by(mut self, contractor_id: impl Into<String>) -> JobUpdates {
        self.dumped_by = Some(contractor_id.into());
        self
    }

    pub fn build(self) -> Result<JobUpdates, FulfillmentError> {
        if self == JobUpdates::default() {
            Err(FulfillmentError::Other("No field to be updated, likely a false call".to_string()))
        } else {
            Ok(self)
        }
    }

    /// Applies the changes to a local copy of a job, the way the store is expected to.
    pub fn apply_to(&self, job: &mut crate::types::jobs::Job, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(picked_up_at) = self.picked_up_at {
            job.picked_up_at = picked_up_at;
        }
        if let Some(completed_at) = self.completed_at {
            job.completed_at = Some(completed_at);
        }
        if let Some(coordinate) = self.contractor_location {
            job.contractor_location = Some(coordinate);
        }
        if let Some(photos) = &self.pickup_photos {
            job.photos_before.push(photos.before.clone());
            job.photos_after.push(photos.after.clone());
        }
        if let Some(record) = &self.disposal_site {
            job.disposal_site = Some(record.clone());
        }
        if let Some(url) = &self.dump_photo {
            job.dump_photo = Some(url.clone());
        }
        if let Some(contractor_id) = &self.dumped_by {
            job.dumped_by = Some(contractor_id.clone());
        }
        job.updated_at = Some(now);
    }
}
