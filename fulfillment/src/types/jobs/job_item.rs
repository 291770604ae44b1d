use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::types::jobs::types::JobStatus;

/// A pickup job as stored by the job record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub pickup_coordinate: Coordinate,
    #[serde(default)]
    pub pickup_address: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub contractor_id: Option<String>,
    #[serde(default)]
    pub photos_before: Vec<String>,
    #[serde(default)]
    pub photos_after: Vec<String>,
    #[serde(default)]
    pub contractor_location: Option<Coordinate>,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disposal_site: Option<DisposalRecord>,
    #[serde(default)]
    pub dump_photo: Option<String>,
    #[serde(default)]
    pub dumped_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The disposal site a job was completed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposalRecord {
    pub site_id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl Job {
    pub fn new(id: impl Into<String>, pickup_coordinate: Coordinate, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            pickup_coordinate,
            pickup_address: None,
            status,
            contractor_id: None,
            photos_before: Vec::new(),
            photos_after: Vec::new(),
            contractor_location: None,
            picked_up_at: None,
            completed_at: None,
            disposal_site: None,
            dump_photo: None,
            dumped_by: None,
            updated_at: None,
        }
    }

    pub fn with_contractor(mut self, contractor_id: impl Into<String>) -> Self {
        self.contractor_id = Some(contractor_id.into());
        self
    }

    pub fn is_assigned_to(&self, contractor_id: &str) -> bool {
        self.contractor_id.as_deref() == Some(contractor_id)
    }
}
