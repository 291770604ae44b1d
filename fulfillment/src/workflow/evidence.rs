use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhotoSlot {
    Before,
    After,
    Dump,
}

/// A photo taken by the device camera, not uploaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedPhoto {
    pub path: PathBuf,
    pub captured_at: DateTime<Utc>,
}

impl StagedPhoto {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), captured_at: Utc::now() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Before/after pickup photos staged on the device.
///
/// Either slot can be retaken freely until the pickup is confirmed.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    before: Option<StagedPhoto>,
    after: Option<StagedPhoto>,
}

impl EvidenceSet {
    pub fn stage_before(&mut self, photo: StagedPhoto) -> Option<StagedPhoto> {
        self.before.replace(photo)
    }

    pub fn stage_after(&mut self, photo: StagedPhoto) -> Option<StagedPhoto> {
        self.after.replace(photo)
    }

    pub fn before(&self) -> Option<&StagedPhoto> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&StagedPhoto> {
        self.after.as_ref()
    }

    /// The first slot still missing, in capture order.
    pub fn missing(&self) -> Option<PhotoSlot> {
        if self.before.is_none() {
            Some(PhotoSlot::Before)
        } else if self.after.is_none() {
            Some(PhotoSlot::After)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_none()
    }

    pub fn clear(&mut self) {
        self.before = None;
        self.after = None;
    }
}
