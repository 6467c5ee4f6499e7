use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Flat directory of uploaded files addressed by generated names.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store bytes under a freshly generated name and return that name.
    ///
    /// The name is derived from `field` and keeps the extension of
    /// `original_name`.
    async fn put(
        &self,
        field: &str,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, StorageError>;

    /// Retrieve an upload as a streaming async reader.
    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError>;

    /// Get the size of an upload in bytes.
    async fn size(&self, name: &str) -> Result<u64, StorageError>;
}
