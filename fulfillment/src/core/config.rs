use std::sync::Arc;

use fulfillment_google_places_service::{GooglePlacesService, GooglePlacesValidatedArgs};
use fulfillment_places_client_interface::PlacesClient;

use crate::core::client::{DeviceLocationProvider, JobRecordStore, NavigationLauncher, ObjectStore};
use crate::error::EngineResult;
use crate::tracking::LocationTracker;
use crate::types::params::{FulfillmentParams, TrackingParams};

/// The app configuration: workflow settings plus every collaborator the workflow talks to
pub struct Config {
    fulfillment: FulfillmentParams,
    tracking: TrackingParams,
    job_store: Box<dyn JobRecordStore>,
    object_store: Box<dyn ObjectStore>,
    places: Box<dyn PlacesClient>,
    navigator: Box<dyn NavigationLauncher>,
}

impl Config {
    pub fn new(
        fulfillment: FulfillmentParams,
        tracking: TrackingParams,
        job_store: Box<dyn JobRecordStore>,
        object_store: Box<dyn ObjectStore>,
        places: Box<dyn PlacesClient>,
        navigator: Box<dyn NavigationLauncher>,
    ) -> Self {
        Self { fulfillment, tracking, job_store, object_store, places, navigator }
    }

    /// Build the Google Places backed client used for disposal site search
    pub fn build_places_client(args: &GooglePlacesValidatedArgs) -> EngineResult<Box<dyn PlacesClient>> {
        Ok(Box::new(GooglePlacesService::new_with_args(args)?))
    }

    /// A fresh tracking engine for one session, using the configured tracking settings
    pub fn new_tracker(&self, provider: Arc<dyn DeviceLocationProvider>) -> LocationTracker {
        LocationTracker::new(provider, self.tracking.clone())
    }

    pub fn fulfillment(&self) -> &FulfillmentParams {
        &self.fulfillment
    }

    pub fn tracking(&self) -> &TrackingParams {
        &self.tracking
    }

    pub fn job_store(&self) -> &dyn JobRecordStore {
        self.job_store.as_ref()
    }

    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    pub fn places(&self) -> &dyn PlacesClient {
        self.places.as_ref()
    }

    pub fn navigator(&self) -> &dyn NavigationLauncher {
        self.navigator.as_ref()
    }
}
