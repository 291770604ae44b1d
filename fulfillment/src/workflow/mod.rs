pub mod evidence;
pub mod guard;
pub mod navigation;
pub mod stage;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::error::fulfillment::{FulfillmentError, FulfillmentResult};
use crate::geo::{Coordinate, Geofence};
use crate::sites::find_nearby_sites;
use crate::tracking::{LocationTracker, Subscription, WatchHandle};
use crate::types::constant::{dump_photo_path, pickup_photo_path, PHOTO_CONTENT_TYPE};
use crate::types::jobs::{DisposalRecord, Job, JobStatus, JobUpdates};
use crate::types::site::DisposalSite;
use evidence::{EvidenceSet, PhotoSlot, StagedPhoto};
use guard::{ArrivalGuard, ArrivalMonitor};
use navigation::RoutePlan;
use stage::{FulfillmentEvent, Stage};

/// Drives one contractor through one job, from assignment to disposal.
///
/// Every transition validates first and persists last: if a guard, an upload or the
/// store write fails, the stage and the job record are left as they were.
pub struct FulfillmentSession {
    config: Arc<Config>,
    tracker: LocationTracker,
    job: Job,
    contractor_id: String,
    stage: Stage,
    evidence: EvidenceSet,
    monitor: Arc<ArrivalMonitor>,
    arrival_subscription: Option<Subscription>,
    watch: Option<WatchHandle>,
}

impl std::fmt::Debug for FulfillmentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FulfillmentSession")
            .field("job_id", &self.job.id)
            .field("contractor_id", &self.contractor_id)
            .field("stage", &self.stage)
            .field("evidence", &self.evidence)
            .field("watch", &self.watch.as_ref().map(WatchHandle::id))
            .finish_non_exhaustive()
    }
}

impl FulfillmentSession {
    /// Load `job_id` and resume at the stage matching its persisted status.
    #[tracing::instrument(skip(config, tracker))]
    pub async fn open(
        config: Arc<Config>,
        tracker: LocationTracker,
        job_id: &str,
        contractor_id: &str,
    ) -> FulfillmentResult<Self> {
        let job = config
            .job_store()
            .get_job(job_id)
            .await?
            .ok_or_else(|| FulfillmentError::JobNotFound { id: job_id.to_string() })?;

        if !job.is_assigned_to(contractor_id) {
            warn!(contractor_id, assigned_to = ?job.contractor_id, "Job is assigned to someone else");
            return Err(FulfillmentError::NotAssigned { id: job.id, contractor_id: contractor_id.to_string() });
        }

        let stage = Stage::from_job_status(job.status)
            .ok_or_else(|| FulfillmentError::InvalidStatus { id: job.id.clone(), job_status: job.status })?;

        let geofence = Geofence::new(config.fulfillment().arrival_threshold_meters);
        let monitor = Arc::new(ArrivalMonitor::new(geofence, job.pickup_coordinate, stage.tracks_arrival()));
        let arrival_subscription = if stage.tracks_arrival() {
            let monitor = Arc::clone(&monitor);
            Some(tracker.subscribe(move |fix| monitor.on_fix(fix)))
        } else {
            None
        };

        info!(job_id = %job.id, %stage, "Opened fulfillment session");
        Ok(Self {
            config,
            tracker,
            job,
            contractor_id: contractor_id.to_string(),
            stage,
            evidence: EvidenceSet::default(),
            monitor,
            arrival_subscription,
            watch: None,
        })
    }

    /// Reopen the job the contractor was in the middle of, if any.
    pub async fn resume_active(
        config: Arc<Config>,
        tracker: LocationTracker,
        contractor_id: &str,
    ) -> FulfillmentResult<Option<Self>> {
        let Some(job) = config.job_store().get_active_job_for_contractor(contractor_id).await? else {
            debug!(contractor_id, "No active job to resume");
            return Ok(None);
        };
        let job_id = job.id.clone();
        Self::open(config, tracker, &job_id, contractor_id).await.map(Some)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn evidence(&self) -> &EvidenceSet {
        &self.evidence
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    /// Live arrival guard, updated on every fix while the session waits for arrival.
    pub fn arrival_guard(&self) -> watch::Receiver<ArrivalGuard> {
        self.monitor.subscribe()
    }

    pub fn arrival_status(&self) -> ArrivalGuard {
        self.monitor.current()
    }

    /// Start the position watch feeding the arrival guard.
    pub async fn start_tracking(&mut self) -> FulfillmentResult<WatchHandle> {
        if self.stage.is_terminal() {
            return Err(FulfillmentError::InvalidTransition { stage: self.stage, event: "start_tracking" });
        }
        let handle = self.tracker.start_watching().await?;
        self.watch = Some(handle.clone());
        Ok(handle)
    }

    /// Hand the route to the pickup over to the navigation app. Advisory only.
    #[tracing::instrument(skip(self), fields(job_id = %self.job.id))]
    pub fn begin_navigation(&self) -> FulfillmentResult<RoutePlan> {
        self.ensure(FulfillmentEvent::BeginNavigation)?;

        let origin = self.tracker.current_fix().filter(|fix| !fix.is_fallback).map(|fix| fix.coordinate);
        let plan = RoutePlan::new(origin, self.job.pickup_coordinate);
        let url = plan
            .navigation_url(self.config.fulfillment().navigation_platform)
            .map_err(|e| FulfillmentError::Other(format!("Failed to build navigation url: {e}")))?;

        self.config.navigator().launch(&url)?;
        info!(
            distance_meters = ?plan.distance_meters,
            estimated_minutes = ?plan.estimated_minutes,
            "Navigation started"
        );
        Ok(plan)
    }

    /// Confirm the contractor is at the pickup. Only allowed inside the geofence.
    #[tracing::instrument(skip(self), fields(job_id = %self.job.id))]
    pub async fn confirm_arrival(&mut self) -> FulfillmentResult<()> {
        self.ensure(FulfillmentEvent::ConfirmArrival)?;

        let fix = self.tracker.current_fix();
        let reading = self.monitor.evaluate(fix.as_ref());
        let Some(fix) = fix.filter(|_| reading.in_range) else {
            warn!(distance_meters = ?reading.distance_meters, "Arrival rejected, contractor is out of range");
            return Err(FulfillmentError::OutOfRange {
                distance_meters: reading.distance_meters,
                threshold_meters: reading.threshold_meters,
            });
        };

        let updates = JobUpdates::new()
            .update_status(JobStatus::InProgress)
            .clear_picked_up_at()
            .update_contractor_location(fix.coordinate)
            .build()?;
        self.job = self.config.job_store().update_job(&self.job, updates).await?;

        self.transition(Stage::Arrived);
        self.monitor.disarm();
        self.arrival_subscription = None;
        self.transition(Stage::InProgress);
        Ok(())
    }

    /// Stage the photo of the waste before loading. Retaking replaces the previous one.
    pub fn capture_before_photo(&mut self, photo: StagedPhoto) -> FulfillmentResult<()> {
        let next = self.ensure(FulfillmentEvent::CaptureBeforePhoto)?;
        if self.evidence.stage_before(photo).is_some() {
            debug!(job_id = %self.job.id, "Before photo retaken");
        }
        if next != self.stage {
            self.transition(next);
        }
        Ok(())
    }

    /// Stage the photo of the cleared spot. Requires the before photo.
    pub fn capture_after_photo(&mut self, photo: StagedPhoto) -> FulfillmentResult<()> {
        self.ensure(FulfillmentEvent::CaptureAfterPhoto)?;
        if self.evidence.before().is_none() {
            return Err(FulfillmentError::MissingEvidence(PhotoSlot::Before));
        }
        if self.evidence.stage_after(photo).is_some() {
            debug!(job_id = %self.job.id, "After photo retaken");
        }
        Ok(())
    }

    /// Upload both photos and mark the job picked up.
    ///
    /// On upload failure the staged photos are kept so the contractor can retry.
    #[tracing::instrument(skip(self), fields(job_id = %self.job.id))]
    pub async fn confirm_pickup(&mut self) -> FulfillmentResult<()> {
        self.ensure(FulfillmentEvent::ConfirmPickup)?;
        let (Some(before), Some(after)) = (self.evidence.before(), self.evidence.after()) else {
            let slot = self.evidence.missing().unwrap_or(PhotoSlot::Before);
            warn!(%slot, "Pickup rejected, photo missing");
            return Err(FulfillmentError::MissingEvidence(slot));
        };

        let timestamp_ms = Utc::now().timestamp_millis();
        let before_path = pickup_photo_path(&self.job.id, PhotoSlot::Before.as_ref(), timestamp_ms);
        let after_path = pickup_photo_path(&self.job.id, PhotoSlot::After.as_ref(), timestamp_ms);
        let (before_url, after_url) = tokio::try_join!(
            self.upload_photo(PhotoSlot::Before, before, &before_path),
            self.upload_photo(PhotoSlot::After, after, &after_path),
        )?;

        let updates = JobUpdates::new()
            .update_status(JobStatus::PickedUp)
            .update_picked_up_at(Utc::now())
            .update_pickup_photos(before_url, after_url)
            .build()?;
        self.job = self.config.job_store().update_job(&self.job, updates).await?;

        self.evidence.clear();
        self.transition(Stage::PickedUp);
        Ok(())
    }

    /// Disposal sites around the contractor, nearest first. Always queries afresh.
    pub async fn nearby_sites(&self) -> FulfillmentResult<Vec<DisposalSite>> {
        self.ensure(FulfillmentEvent::ListNearbySites)?;
        let origin = self.search_origin().await;
        let params = self.config.fulfillment();
        find_nearby_sites(self.config.places(), &origin, &params.site_keyword, params.site_search_radius_meters).await
    }

    /// Record where the waste was dumped and complete the job.
    ///
    /// `site_id` must be among the sites returned by a fresh search.
    #[tracing::instrument(skip(self, dump_photo), fields(job_id = %self.job.id))]
    pub async fn select_disposal_site(
        &mut self,
        site_id: &str,
        dump_photo: Option<StagedPhoto>,
    ) -> FulfillmentResult<DisposalSite> {
        self.ensure(FulfillmentEvent::SelectDisposalSite)?;

        let site = self
            .nearby_sites()
            .await?
            .into_iter()
            .find(|site| site.id == site_id)
            .ok_or_else(|| FulfillmentError::SiteNotOffered { site_id: site_id.to_string() })?;

        let dump_url = match &dump_photo {
            Some(photo) => {
                let path = dump_photo_path(&self.job.id, Utc::now().timestamp_millis());
                Some(self.upload_photo(PhotoSlot::Dump, photo, &path).await?)
            }
            None => None,
        };

        let mut updates = JobUpdates::new()
            .update_status(JobStatus::Completed)
            .update_completed_at(Utc::now())
            .update_disposal_site(DisposalRecord {
                site_id: site.id.clone(),
                name: site.name.clone(),
                coordinate: site.coordinate,
            })
            .update_dumped_by(self.contractor_id.clone());
        if let Some(url) = dump_url {
            updates = updates.update_dump_photo(url);
        }
        self.job = self.config.job_store().update_job(&self.job, updates.build()?).await?;

        self.transition(Stage::Completed);
        self.stop_tracking();
        Ok(site)
    }

    /// Abandon or finish the session, releasing the watch and subscriptions.
    pub fn close(mut self) {
        self.stop_tracking();
        self.tracker.shutdown();
        info!(job_id = %self.job.id, stage = %self.stage, "Closed fulfillment session");
    }

    fn stop_tracking(&mut self) {
        self.monitor.disarm();
        self.arrival_subscription = None;
        if let Some(handle) = self.watch.take() {
            self.tracker.stop_watching(&handle);
        }
    }

    /// Fresh fix if possible, else the last real one, else the pickup itself.
    async fn search_origin(&self) -> Coordinate {
        match self.tracker.get_current_fix().await {
            Ok(fix) if !fix.is_fallback => return fix.coordinate,
            Ok(_) => debug!("Only a fallback fix is available for the site search"),
            Err(e) => warn!(error = %e, "Could not refresh location for the site search"),
        }
        self.tracker
            .current_fix()
            .filter(|fix| !fix.is_fallback)
            .map(|fix| fix.coordinate)
            .unwrap_or(self.job.pickup_coordinate)
    }

    async fn upload_photo(&self, slot: PhotoSlot, photo: &StagedPhoto, path: &str) -> FulfillmentResult<String> {
        let data = tokio::fs::read(photo.path()).await.map_err(|e| FulfillmentError::UploadFailed {
            slot,
            message: format!("could not read {}: {}", photo.path().display(), e),
        })?;
        let url = self
            .config
            .object_store()
            .upload(path, Bytes::from(data), PHOTO_CONTENT_TYPE)
            .await
            .map_err(|e| FulfillmentError::UploadFailed { slot, message: e.to_string() })?;
        debug!(%slot, path, "Uploaded photo");
        Ok(url)
    }

    fn ensure(&self, event: FulfillmentEvent) -> FulfillmentResult<Stage> {
        self.stage.next(event).ok_or(FulfillmentError::InvalidTransition { stage: self.stage, event: event.into() })
    }

    fn transition(&mut self, to: Stage) {
        info!(job_id = %self.job.id, from = %self.stage, %to, "Job stage transition");
        self.stage = to;
    }
}
