pub mod job_item;
pub mod job_updates;
pub mod types;

pub use job_item::{DisposalRecord, Job};
pub use job_updates::JobUpdates;
pub use types::JobStatus;
