pub mod fulfillment;
pub mod places;
pub mod tracking;

pub use fulfillment::FulfillmentParams;
pub use tracking::TrackingParams;
