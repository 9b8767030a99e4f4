use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A media object held by a [`MediaStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path relative to the store root, shaped as `{shard}/{hash}.{ext}`.
    pub path: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Content-addressed storage for uploaded media files.
///
/// Objects keep their file extension so the public URL stays
/// recognizable to browsers and CDNs.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes under their content hash and return the stored object.
    ///
    /// Identical content with the same extension maps to the same path,
    /// so repeated uploads deduplicate to a single file.
    async fn put(&self, data: &[u8], extension: &str) -> Result<StoredObject, StorageError>;

    /// Open a stored object for streaming, returning the reader and size.
    ///
    /// The path must be a relative object path as returned by [`put`];
    /// anything else is rejected before touching the filesystem.
    ///
    /// [`put`]: MediaStore::put
    async fn open(&self, path: &str) -> Result<(BoxReader, u64), StorageError>;

    /// Retrieve all bytes of a stored object.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let (mut reader, _size) = self.open(path).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
