use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::naming::{generate_upload_name, is_safe_name};
use super::traits::{BoxReader, UploadStore};

/// Attempts at finding an unused generated name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Filesystem-backed upload store.
///
/// Files live directly under `base_path`. Partially written uploads are kept
/// in a hidden sibling directory (`.{dir}.partial`) until they are renamed
/// into place, so nothing half-written is ever inside the served directory.
pub struct FilesystemUploadStore {
    base_path: PathBuf,
    temp_dir: PathBuf,
    max_size: u64,
}

/// `uploads` -> `.uploads.partial`, next to `uploads`.
fn partial_dir_for(base_path: &Path) -> PathBuf {
    let dir_name = base_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "uploads".to_string());
    let parent = base_path.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!(".{dir_name}.partial"))
}

impl FilesystemUploadStore {
    /// Create a new filesystem upload store, creating the directories if needed.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        let temp_dir = partial_dir_for(&base_path);
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(&temp_dir).await?;
        Ok(Self {
            base_path,
            temp_dir,
            max_size,
        })
    }

    /// Resolve a stored name to its path, rejecting anything that could
    /// escape the upload directory.
    fn file_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.temp_dir.join(name)
    }
}

#[async_trait]
impl UploadStore for FilesystemUploadStore {
    async fn put(
        &self,
        field: &str,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let mut name = generate_upload_name(field, original_name);
        let mut attempts = 1;
        while fs::try_exists(self.file_path(&name)?).await? {
            if attempts >= MAX_NAME_ATTEMPTS {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "could not find an unused upload name",
                )));
            }
            name = generate_upload_name(field, original_name);
            attempts += 1;
        }

        let temp_path = self.temp_path(&name);
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, self.file_path(&name)?).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(name = %name, size = data.len(), "Stored upload");
        Ok(name)
    }

    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError> {
        let path = self.file_path(name)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, name: &str) -> Result<u64, StorageError> {
        let path = self.file_path(name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
