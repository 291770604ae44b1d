
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use rstest::*;
use tempfile::TempDir;

use crate::core::client::job_store::{JobStoreError, MockJobRecordStore};
use crate::core::client::navigation::{MockNavigationLauncher, NavigationError};
use crate::core::client::storage::{MockObjectStore, StorageError};
use crate::core::config::Config;
use crate::error::fulfillment::FulfillmentError;
use crate::geo::Coordinate;
use crate::tests::common::constants::{
    AWAY_FROM_PICKUP, CONTRACTOR_ID, JOB_ID, NEAR_PICKUP, OTHER_CONTRACTOR_ID, STORAGE_BASE_URL,
};
use crate::tests::common::{
    assigned_job, coordinate, device_position, in_progress_job, job_with_status, picked_up_job, FakeLocationProvider,
};
use crate::tests::config::{
    place, places_returning, recording_job_store, recording_object_store, TestConfigBuilder, UpdateLog,
};
use crate::types::jobs::{Job, JobStatus};
use crate::workflow::evidence::{PhotoSlot, StagedPhoto};
use crate::workflow::stage::Stage;
use crate::workflow::FulfillmentSession;

fn near_pickup() -> Coordinate {
    coordinate(NEAR_PICKUP.0, NEAR_PICKUP.1)
}

fn away_from_pickup() -> Coordinate {
    coordinate(AWAY_FROM_PICKUP.0, AWAY_FROM_PICKUP.1)
}

/// Writes a fake jpeg into `dir` and stages it
pub(crate) fn staged_photo(dir: &TempDir, name: &str) -> StagedPhoto {
    let path = dir.path().join(name);
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).expect("failed to write test photo");
    StagedPhoto::new(path)
}

pub(crate) async fn open_session(config: &Arc<Config>, provider: &Arc<FakeLocationProvider>) -> FulfillmentSession {
    FulfillmentSession::open(Arc::clone(config), config.new_tracker(provider.clone()), JOB_ID, CONTRACTOR_ID)
        .await
        .expect("session should open")
}

/// A store holding `job` that must never be written to
fn read_only_store(job: Job) -> MockJobRecordStore {
    let mut store = MockJobRecordStore::new();
    store.expect_get_job().returning(move |_| Ok(Some(job.clone())));
    store.expect_update_job().never();
    store
}

/// Session opened in `in_progress` with both photos staged
async fn session_ready_for_pickup(
    builder: TestConfigBuilder,
    dir: &TempDir,
) -> (FulfillmentSession, Arc<FakeLocationProvider>) {
    let config = builder.build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    session.capture_before_photo(staged_photo(dir, "before.jpg")).unwrap();
    session.capture_after_photo(staged_photo(dir, "after.jpg")).unwrap();
    (session, provider)
}

fn updates_of(log: &UpdateLog) -> Vec<crate::types::jobs::JobUpdates> {
    log.lock().unwrap().clone()
}

#[rstest]
#[tokio::test]
async fn open_unknown_job_fails(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let result =
        FulfillmentSession::open(Arc::clone(&config), config.new_tracker(provider), "job-404", CONTRACTOR_ID).await;

    assert_matches!(result, Err(FulfillmentError::JobNotFound { id }) if id == "job-404");
}

#[rstest]
#[tokio::test]
async fn open_job_of_another_contractor_fails(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job.with_contractor(OTHER_CONTRACTOR_ID));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let result =
        FulfillmentSession::open(Arc::clone(&config), config.new_tracker(provider), JOB_ID, CONTRACTOR_ID).await;

    assert_matches!(result, Err(FulfillmentError::NotAssigned { contractor_id, .. }) if contractor_id == CONTRACTOR_ID);
}

#[rstest]
#[tokio::test]
async fn session_debug_shows_job_stage_and_evidence(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, _) = recording_job_store(in_progress_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    session.capture_before_photo(staged_photo(&dir, "before.jpg")).unwrap();

    let rendered = format!("{session:?}");

    assert!(rendered.starts_with("FulfillmentSession"), "{rendered}");
    assert!(rendered.contains(JOB_ID), "{rendered}");
    assert!(rendered.contains(CONTRACTOR_ID), "{rendered}");
    assert!(rendered.contains("InProgress"), "{rendered}");
    assert!(rendered.contains("before.jpg"), "{rendered}");
}

#[rstest]
#[case(JobStatus::Scheduled)]
#[case(JobStatus::Completed)]
#[case(JobStatus::Cancelled)]
#[tokio::test]
async fn open_job_in_unworkable_status_fails(#[case] status: JobStatus) {
    let (store, _) = recording_job_store(job_with_status(status));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let result =
        FulfillmentSession::open(Arc::clone(&config), config.new_tracker(provider), JOB_ID, CONTRACTOR_ID).await;

    assert_matches!(result, Err(FulfillmentError::InvalidStatus { job_status, .. }) if job_status == status);
}

#[rstest]
#[case(JobStatus::Assigned, Stage::Assigned)]
#[case(JobStatus::InProgress, Stage::InProgress)]
#[case(JobStatus::PickedUp, Stage::PickedUp)]
#[tokio::test]
async fn open_resumes_at_the_persisted_stage(#[case] status: JobStatus, #[case] expected: Stage) {
    let (store, _) = recording_job_store(job_with_status(status));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let session = open_session(&config, &provider).await;

    assert_eq!(session.stage(), expected);
    assert!(session.evidence().before().is_none());
}

#[rstest]
#[tokio::test]
async fn resume_active_reopens_the_contractors_job(in_progress_job: Job) {
    let (mut store, _) = recording_job_store(in_progress_job.clone());
    store
        .expect_get_active_job_for_contractor()
        .withf(|contractor_id| contractor_id == CONTRACTOR_ID)
        .times(1)
        .returning(move |_| Ok(Some(in_progress_job.clone())));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let session = FulfillmentSession::resume_active(Arc::clone(&config), config.new_tracker(provider), CONTRACTOR_ID)
        .await
        .unwrap()
        .expect("an active job should be resumed");

    assert_eq!(session.job().id, JOB_ID);
    assert_eq!(session.stage(), Stage::InProgress);
}

#[rstest]
#[tokio::test]
async fn resume_active_without_active_job_is_none() {
    let mut store = MockJobRecordStore::new();
    store.expect_get_active_job_for_contractor().returning(|_| Ok(None));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));

    let session =
        FulfillmentSession::resume_active(Arc::clone(&config), config.new_tracker(provider), CONTRACTOR_ID).await;

    assert_matches!(session, Ok(None));
}

#[rstest]
#[tokio::test]
async fn confirm_arrival_out_of_range_writes_nothing(assigned_job: Job) {
    let config = TestConfigBuilder::new().configure_job_store(read_only_store(assigned_job)).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(away_from_pickup()));
    let mut session = open_session(&config, &provider).await;
    session.tracker().get_current_fix().await.unwrap();

    let result = session.confirm_arrival().await;

    assert_matches!(
        result,
        Err(FulfillmentError::OutOfRange { distance_meters: Some(d), threshold_meters })
            if d > 300.0 && threshold_meters == 30.5
    );
    assert_eq!(session.stage(), Stage::Assigned);
    assert_eq!(session.job().status, JobStatus::Assigned);
}

#[rstest]
#[tokio::test]
async fn confirm_arrival_without_any_fix_is_out_of_range(assigned_job: Job) {
    let config = TestConfigBuilder::new().configure_job_store(read_only_store(assigned_job)).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    let error = session.confirm_arrival().await.unwrap_err();

    assert_matches!(error, FulfillmentError::OutOfRange { distance_meters: None, .. });
    assert!(error.user_message().contains("location unknown"));
}

#[rstest]
#[tokio::test]
async fn confirm_arrival_on_a_fallback_fix_is_out_of_range(assigned_job: Job) {
    // the fallback coordinate is right next to the pickup, it still must not count
    let config = TestConfigBuilder::new().configure_job_store(read_only_store(assigned_job)).build();
    let provider = Arc::new(FakeLocationProvider::denied());
    let mut session = open_session(&config, &provider).await;
    let fix = session.tracker().get_current_fix().await.unwrap();
    assert!(fix.is_fallback);

    assert_matches!(session.confirm_arrival().await, Err(FulfillmentError::OutOfRange { distance_meters: None, .. }));
    assert!(!session.arrival_status().is_open());
    assert!(session.arrival_status().fix_is_fallback);
}

#[rstest]
#[tokio::test]
async fn confirm_arrival_in_range_persists_in_progress(assigned_job: Job) {
    let (store, log) = recording_job_store(assigned_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    session.tracker().get_current_fix().await.unwrap();

    session.confirm_arrival().await.unwrap();

    assert_eq!(session.stage(), Stage::InProgress);
    assert_eq!(session.job().status, JobStatus::InProgress);
    assert_eq!(session.job().contractor_location, Some(near_pickup()));
    let updates = updates_of(&log);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, Some(JobStatus::InProgress));
    assert_eq!(updates[0].picked_up_at, Some(None));
    assert_eq!(updates[0].contractor_location, Some(near_pickup()));

    // arrival cannot be confirmed twice
    assert_matches!(session.confirm_arrival().await, Err(FulfillmentError::InvalidTransition { .. }));
}

#[rstest]
#[tokio::test]
async fn store_failure_keeps_the_stage(assigned_job: Job) {
    let mut store = MockJobRecordStore::new();
    store.expect_get_job().returning(move |_| Ok(Some(assigned_job.clone())));
    store.expect_update_job().times(1).returning(|_, _| Err(JobStoreError::Unavailable("connection refused".into())));
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    session.tracker().get_current_fix().await.unwrap();

    assert_matches!(session.confirm_arrival().await, Err(FulfillmentError::Store(JobStoreError::Unavailable(_))));
    assert_eq!(session.stage(), Stage::Assigned);
    assert!(session.arrival_status().is_open());
}

#[rstest]
#[tokio::test]
async fn arrival_guard_follows_the_watch(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(away_from_pickup()));
    let mut session = open_session(&config, &provider).await;
    let mut guard = session.arrival_guard();
    assert!(!guard.borrow().is_open());

    session.start_tracking().await.unwrap();
    provider.latest_watch().send(device_position(near_pickup())).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), guard.changed()).await.expect("guard not updated").unwrap();

    let status = *guard.borrow();
    assert!(status.is_open());
    assert!(!status.fix_is_fallback);
    assert!(status.reading.distance_meters.is_some_and(|d| d < 30.5));

    // the fix delivered by the watch is the one arrival is checked against
    session.confirm_arrival().await.unwrap();
    assert_eq!(session.stage(), Stage::InProgress);
}

#[rstest]
#[tokio::test]
async fn begin_navigation_launches_a_route_to_the_pickup(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job);
    let mut navigator = MockNavigationLauncher::new();
    navigator
        .expect_launch()
        .withf(|url| {
            url.as_str().starts_with("https://www.google.com/maps/dir/?api=1")
                && url.as_str().contains("origin=33.752%2C-84.39")
                && url.as_str().contains("destination=33.7491%2C-84.3881")
        })
        .times(1)
        .returning(|_| Ok(()));
    let config = TestConfigBuilder::new().configure_job_store(store).configure_navigator(navigator).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(away_from_pickup()));
    let session = open_session(&config, &provider).await;
    session.tracker().get_current_fix().await.unwrap();

    let plan = session.begin_navigation().unwrap();

    assert_eq!(plan.origin, Some(away_from_pickup()));
    assert!(plan.distance_meters.is_some_and(|d| d > 300.0 && d < 400.0));
    assert_eq!(plan.estimated_minutes, Some(1));
    assert_eq!(session.stage(), Stage::Assigned);
}

#[rstest]
#[tokio::test]
async fn begin_navigation_reports_launch_failure(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job);
    let mut navigator = MockNavigationLauncher::new();
    navigator.expect_launch().returning(|url| Err(NavigationError::Unsupported(url.to_string())));
    let config = TestConfigBuilder::new().configure_job_store(store).configure_navigator(navigator).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let session = open_session(&config, &provider).await;

    let result = session.begin_navigation();

    assert_matches!(result, Err(FulfillmentError::NavigationUnavailable(NavigationError::Unsupported(_))));
}

#[rstest]
#[tokio::test]
async fn photos_are_not_accepted_before_arrival(assigned_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, _) = recording_job_store(assigned_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    assert_matches!(
        session.capture_before_photo(staged_photo(&dir, "before.jpg")),
        Err(FulfillmentError::InvalidTransition { stage: Stage::Assigned, event: "capture_before_photo" })
    );
    assert_matches!(session.confirm_pickup().await, Err(FulfillmentError::InvalidTransition { .. }));
    assert_matches!(session.nearby_sites().await, Err(FulfillmentError::InvalidTransition { .. }));
}

#[rstest]
#[tokio::test]
async fn after_photo_requires_before_photo(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, _) = recording_job_store(in_progress_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    assert_matches!(
        session.capture_after_photo(staged_photo(&dir, "after.jpg")),
        Err(FulfillmentError::MissingEvidence(PhotoSlot::Before))
    );
    assert!(session.evidence().after().is_none());
}

#[rstest]
#[tokio::test]
async fn photos_can_be_retaken_until_pickup(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, _) = recording_job_store(in_progress_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    session.capture_before_photo(staged_photo(&dir, "before-1.jpg")).unwrap();
    session.capture_after_photo(staged_photo(&dir, "after-1.jpg")).unwrap();
    session.capture_before_photo(staged_photo(&dir, "before-2.jpg")).unwrap();
    session.capture_after_photo(staged_photo(&dir, "after-2.jpg")).unwrap();

    assert_eq!(session.evidence().before().unwrap().path(), dir.path().join("before-2.jpg"));
    assert_eq!(session.evidence().after().unwrap().path(), dir.path().join("after-2.jpg"));
    assert!(session.evidence().is_complete());
    assert_eq!(session.stage(), Stage::InProgress);
}

#[rstest]
#[tokio::test]
async fn confirm_pickup_without_both_photos_is_rejected(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let mut object_store = MockObjectStore::new();
    object_store.expect_upload().never();
    let config = TestConfigBuilder::new()
        .configure_job_store(read_only_store(in_progress_job))
        .configure_object_store(object_store)
        .build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    assert_matches!(session.confirm_pickup().await, Err(FulfillmentError::MissingEvidence(PhotoSlot::Before)));

    session.capture_before_photo(staged_photo(&dir, "before.jpg")).unwrap();
    let error = session.confirm_pickup().await.unwrap_err();
    assert_matches!(error, FulfillmentError::MissingEvidence(PhotoSlot::After));
    assert_eq!(error.user_message(), "Take the after photo first.");

    assert_eq!(session.stage(), Stage::InProgress);
    assert_eq!(session.job().status, JobStatus::InProgress);
}

#[rstest]
#[tokio::test]
async fn confirm_pickup_uploads_both_photos_and_persists(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, log) = recording_job_store(in_progress_job);
    let (object_store, paths) = recording_object_store();
    let builder = TestConfigBuilder::new().configure_job_store(store).configure_object_store(object_store);
    let (mut session, _provider) = session_ready_for_pickup(builder, &dir).await;

    session.confirm_pickup().await.unwrap();

    let mut uploaded = paths.lock().unwrap().clone();
    uploaded.sort();
    assert_eq!(uploaded.len(), 2);
    assert!(uploaded[0].starts_with("pickup_photos/job-0001/after_"), "{}", uploaded[0]);
    assert!(uploaded[1].starts_with("pickup_photos/job-0001/before_"), "{}", uploaded[1]);

    let updates = updates_of(&log);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, Some(JobStatus::PickedUp));
    assert_matches!(updates[0].picked_up_at, Some(Some(_)));

    let job = session.job();
    assert_eq!(job.status, JobStatus::PickedUp);
    assert_eq!(job.photos_before.len(), 1);
    assert!(job.photos_before[0].starts_with(&format!("{}/pickup_photos/job-0001/before_", STORAGE_BASE_URL)));
    assert!(job.photos_after[0].starts_with(&format!("{}/pickup_photos/job-0001/after_", STORAGE_BASE_URL)));
    assert!(job.picked_up_at.is_some());
    assert_eq!(session.stage(), Stage::PickedUp);
    assert!(!session.evidence().is_complete());
}

#[rstest]
#[tokio::test]
async fn upload_failure_keeps_the_staged_photos(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let mut object_store = MockObjectStore::new();
    object_store.expect_upload().returning(|path, _, _| {
        if path.contains("/after_") {
            Err(StorageError::Unavailable("timeout".to_string()))
        } else {
            Ok(format!("{}/{}", STORAGE_BASE_URL, path))
        }
    });
    let builder = TestConfigBuilder::new()
        .configure_job_store(read_only_store(in_progress_job))
        .configure_object_store(object_store);
    let (mut session, _provider) = session_ready_for_pickup(builder, &dir).await;

    let error = session.confirm_pickup().await.unwrap_err();

    assert_matches!(error, FulfillmentError::UploadFailed { slot: PhotoSlot::After, .. });
    assert!(error.is_recoverable());
    assert!(session.evidence().is_complete());
    assert_eq!(session.stage(), Stage::InProgress);
}

#[rstest]
#[tokio::test]
async fn unreadable_photo_is_an_upload_failure(in_progress_job: Job) {
    let dir = TempDir::new().unwrap();
    let (object_store, _) = recording_object_store();
    let builder = TestConfigBuilder::new()
        .configure_job_store(read_only_store(in_progress_job))
        .configure_object_store(object_store);
    let (mut session, _provider) = session_ready_for_pickup(builder, &dir).await;
    std::fs::remove_file(dir.path().join("before.jpg")).unwrap();

    assert_matches!(
        session.confirm_pickup().await,
        Err(FulfillmentError::UploadFailed { slot: PhotoSlot::Before, .. })
    );
    assert_eq!(session.stage(), Stage::InProgress);
}

#[rstest]
#[tokio::test]
async fn nearby_sites_fall_back_to_the_pickup_without_location(picked_up_job: Job) {
    let pickup = picked_up_job.pickup_coordinate;
    let (store, _) = recording_job_store(picked_up_job);
    let mut places = fulfillment_places_client_interface::MockPlacesClient::new();
    places
        .expect_nearby_search()
        .withf(move |request| {
            request.location.latitude == pickup.latitude() && request.location.longitude == pickup.longitude()
        })
        .times(1)
        .returning(|_| Ok(vec![]));
    let config = TestConfigBuilder::new().configure_job_store(store).configure_places(places).build();
    let provider = Arc::new(FakeLocationProvider::denied());
    let session = open_session(&config, &provider).await;

    let sites = session.nearby_sites().await.unwrap();

    assert!(sites.is_empty());
}

#[rstest]
#[tokio::test]
async fn nearby_sites_are_not_held_up_by_a_stalled_geocoder(picked_up_job: Job) {
    let places = places_returning(vec![place("landfill-1", 33.76, -84.39), place("dumpster-1", 33.75, -84.389)]);
    let config = TestConfigBuilder::new()
        .configure_job_store(read_only_store(picked_up_job))
        .configure_places(places)
        .build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    provider.hang_geocoder();
    let session = open_session(&config, &provider).await;

    let sites = tokio::time::timeout(Duration::from_secs(2), session.nearby_sites())
        .await
        .expect("site search must not wait on reverse geocoding")
        .unwrap();

    let ids: Vec<&str> = sites.iter().map(|site| site.id.as_str()).collect();
    assert_eq!(ids, vec!["dumpster-1", "landfill-1"]);
}

#[rstest]
#[tokio::test]
async fn selecting_an_unlisted_site_is_rejected(picked_up_job: Job) {
    let places = places_returning(vec![place("landfill-1", 33.76, -84.39)]);
    let config = TestConfigBuilder::new()
        .configure_job_store(read_only_store(picked_up_job))
        .configure_places(places)
        .build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    let result = session.select_disposal_site("landfill-9", None).await;

    assert_matches!(result, Err(FulfillmentError::SiteNotOffered { site_id }) if site_id == "landfill-9");
    assert_eq!(session.stage(), Stage::PickedUp);
}

#[rstest]
#[tokio::test]
async fn selecting_a_site_completes_the_job(picked_up_job: Job) {
    let dir = TempDir::new().unwrap();
    let (store, log) = recording_job_store(picked_up_job);
    let (object_store, paths) = recording_object_store();
    let places = places_returning(vec![place("transfer-station", 33.80, -84.40), place("landfill-1", 33.76, -84.39)]);
    let config = TestConfigBuilder::new()
        .configure_job_store(store)
        .configure_object_store(object_store)
        .configure_places(places)
        .build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    let watch = session.start_tracking().await.unwrap();

    let sites = session.nearby_sites().await.unwrap();
    assert_eq!(sites[0].id, "landfill-1");

    let site = session.select_disposal_site("transfer-station", Some(staged_photo(&dir, "dump.jpg"))).await.unwrap();

    assert_eq!(site.id, "transfer-station");
    assert_eq!(session.stage(), Stage::Completed);
    let job = session.job();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.completed_at.is_some());
    assert_eq!(job.dumped_by.as_deref(), Some(CONTRACTOR_ID));
    assert_eq!(job.disposal_site.as_ref().map(|record| record.site_id.as_str()), Some("transfer-station"));
    assert!(job.dump_photo.as_deref().is_some_and(|url| url.contains("/dump_photos/job-0001/")));
    assert_eq!(paths.lock().unwrap().len(), 1);
    assert_eq!(updates_of(&log).last().and_then(|updates| updates.status), Some(JobStatus::Completed));

    // tracking ends with the job
    assert!(!watch.is_active());
    assert_eq!(session.tracker().active_watch(), None);
    assert_matches!(session.start_tracking().await, Err(FulfillmentError::InvalidTransition { .. }));
}

#[rstest]
#[tokio::test]
async fn dump_photo_is_optional(picked_up_job: Job) {
    let (store, log) = recording_job_store(picked_up_job);
    let places = places_returning(vec![place("landfill-1", 33.76, -84.39)]);
    let config = TestConfigBuilder::new().configure_job_store(store).configure_places(places).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    session.select_disposal_site("landfill-1", None).await.unwrap();

    let updates = updates_of(&log);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].dump_photo, None);
    assert_eq!(updates[0].dumped_by.as_deref(), Some(CONTRACTOR_ID));
    assert_eq!(session.job().dump_photo, None);
}

#[rstest]
#[tokio::test]
async fn site_search_outage_blocks_completion(picked_up_job: Job) {
    let mut places = fulfillment_places_client_interface::MockPlacesClient::new();
    places.expect_nearby_search().returning(|_| {
        Err(fulfillment_places_client_interface::PlacesClientError::Transport("dns failure".to_string()))
    });
    let config = TestConfigBuilder::new()
        .configure_job_store(read_only_store(picked_up_job))
        .configure_places(places)
        .build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;

    assert_matches!(
        session.select_disposal_site("landfill-1", None).await,
        Err(FulfillmentError::SiteSearchUnavailable(_))
    );
    assert_eq!(session.stage(), Stage::PickedUp);
}

#[rstest]
#[tokio::test]
async fn close_releases_tracking(assigned_job: Job) {
    let (store, _) = recording_job_store(assigned_job);
    let config = TestConfigBuilder::new().configure_job_store(store).build();
    let provider = Arc::new(FakeLocationProvider::granted_at(near_pickup()));
    let mut session = open_session(&config, &provider).await;
    let watch = session.start_tracking().await.unwrap();
    assert_eq!(session.tracker().subscriber_count(), 1);

    session.close();

    assert!(!watch.is_active());
}
