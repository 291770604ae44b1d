pub mod cli;
pub mod core;
pub mod error;
pub mod geo;
pub mod sites;
pub mod tracking;
pub mod types;
pub mod utils;
pub mod workflow;


// Re-export commonly used items
pub use error::{EngineError, EngineResult, FulfillmentError, FulfillmentResult};
pub use tracking::LocationTracker;
pub use workflow::FulfillmentSession;
