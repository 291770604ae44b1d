use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobStoreError {
    #[error("Job store unreachable: {0}")]
    Unavailable(String),

    #[error("Job {id:?} was modified concurrently")]
    Conflict { id: String },

    #[error("Failed to (de)serialize job record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Job store error: {0}")]
    Other(String),
}
