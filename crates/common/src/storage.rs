//! Media store for uploaded images.
//!
//! Files live in one flat directory under generated names. The trait keeps
//! the core services independent of where that directory is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{AppError, AppResult};

/// File extensions accepted for uploads (lowercase, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Save a file under `key`.
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<()>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Shared handle to the configured backend.
pub type MediaStorage = Arc<dyn StorageBackend>;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        // Keys are flat generated names; anything else could escape the directory.
        if key.is_empty()
            || key.contains(['/', '\\'])
            || key.starts_with('.')
            || key.contains("..")
        {
            return Err(AppError::BadRequest(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Returns the lowercased extension of `file_name` if it is an accepted image type.
#[must_use]
pub fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Pick a writable data directory.
///
/// Tries `preferred` first and falls back to `<tmp>/famfeed`. Returns the
/// chosen directory and whether the fallback was used.
pub fn resolve_data_dir(preferred: &Path) -> AppResult<(PathBuf, bool)> {
    if is_writable_dir(preferred) {
        return Ok((preferred.to_path_buf(), false));
    }

    let fallback = std::env::temp_dir().join("famfeed");
    if is_writable_dir(&fallback) {
        return Ok((fallback, true));
    }

    Err(AppError::Storage(format!(
        "Neither {} nor {} is writable",
        preferred.display(),
        fallback.display()
    )))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write-probe");
    let writable = std::fs::write(&probe, b"ok").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}
