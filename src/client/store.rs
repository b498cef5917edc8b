use super::types::{FileContent, FileName, StoreResult};
use crate::metadata::types::FileMetadataSnapshot;
use crate::status::types::SystemStatus;

use async_trait::async_trait;

/// The operations the console performs against the cluster.
///
/// Every call is exactly one round trip: no retries, no caching. Implementors
/// are shared as `Arc<dyn RemoteStore>` by the file controller, the metadata
/// aggregator and the status poller.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_files(&self) -> StoreResult<Vec<FileName>>;

    async fn read_file(&self, name: &FileName) -> StoreResult<FileContent>;

    /// Fails with `Conflict` if the name is already taken.
    async fn create_file(&self, name: &FileName, content: &str) -> StoreResult<()>;

    /// Replaces the whole content of an existing file.
    async fn write_file(&self, name: &FileName, content: &str) -> StoreResult<()>;

    async fn append_file(&self, name: &FileName, text: &str) -> StoreResult<()>;

    async fn delete_file(&self, name: &FileName) -> StoreResult<()>;

    async fn file_metadata(&self, name: &FileName) -> StoreResult<FileMetadataSnapshot>;

    async fn system_status(&self) -> StoreResult<SystemStatus>;

    /// `Ok(false)` when the API server is up but cannot reach the master.
    async fn health(&self) -> StoreResult<bool>;
}
