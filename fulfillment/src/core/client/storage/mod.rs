pub mod error;

use async_trait::async_trait;
use bytes::Bytes;
pub use error::StorageError;

/// Trait defining blob upload for job evidence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `path` and return a URL the job record can reference
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<String, StorageError>;
}
