use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{BoxReader, MediaStore, StoredObject};

/// Filesystem-backed content-addressed media store.
///
/// Objects are stored in a Git-style sharded directory layout:
/// `{root}/{first 2 hex chars}/{remaining 62 hex chars}.{ext}`
pub struct FsMediaStore {
    root: PathBuf,
    max_size: u64,
}

impl FsMediaStore {
    /// Create a new filesystem media store rooted at `root`.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    fn object_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put(&self, data: &[u8], extension: &str) -> Result<StoredObject, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let extension = normalize_extension(extension).ok_or_else(|| {
            StorageError::InvalidPath(format!("bad file extension: {extension:?}"))
        })?;

        let hash = ContentHash::compute(data);
        let relative = format!("{}/{}.{}", hash.shard_prefix(), hash.shard_suffix(), extension);
        let object_path = self.object_path(&relative);

        if object_path.exists() {
            return Ok(StoredObject {
                path: relative,
                size: data.len() as u64,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredObject {
            path: relative,
            size: data.len() as u64,
        })
    }

    async fn open(&self, path: &str) -> Result<(BoxReader, u64), StorageError> {
        if !is_valid_object_path(path) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        let object_path = self.object_path(path);
        let file = match fs::File::open(&object_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let size = file.metadata().await?.len();
        Ok((Box::new(BufReader::new(file)), size))
    }
}

/// Lowercase a file extension, rejecting anything that could escape the
/// `{shard}/{hash}.{ext}` layout.
fn normalize_extension(extension: &str) -> Option<String> {
    let extension = extension.to_ascii_lowercase();
    if extension.is_empty()
        || extension.len() > 8
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(extension)
}

/// Check that a client-supplied path has the exact shape produced by `put`.
///
/// This is the only line of defense between the URL namespace and the
/// filesystem, so it allows nothing but `{2 hex}/{62 hex}.{ext}`.
fn is_valid_object_path(path: &str) -> bool {
    let Some((shard, filename)) = path.split_once('/') else {
        return false;
    };
    let Some((stem, extension)) = filename.rsplit_once('.') else {
        return false;
    };

    shard.len() == 2
        && shard.chars().all(is_lower_hex)
        && stem.len() == 62
        && stem.chars().all(is_lower_hex)
        && !extension.is_empty()
        && extension.len() <= 8
        && extension.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_lower_hex(c: char) -> bool {
    c.is_ascii_digit() || ('a'..='f').contains(&c)
}
