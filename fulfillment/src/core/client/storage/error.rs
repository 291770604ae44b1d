use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to upload object {path:?}: {message}")]
    UploadFailed { path: String, message: String },

    #[error("Object store unreachable: {0}")]
    Unavailable(String),
}
