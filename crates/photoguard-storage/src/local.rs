use crate::keys::artifact_key;
use crate::traits::{ArtifactStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Artifacts live at `{base_path}/{bucket}/{file_id}`. Permissions are not
/// modelled on disk.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for artifact storage (e.g., "/var/lib/photoguard")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    fn artifact_path(&self, bucket: &str, file_id: &str) -> StorageResult<PathBuf> {
        Ok(self.base_path.join(artifact_key(bucket, file_id)?))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_synced(file: &mut fs::File, path: &Path, data: &[u8]) -> StorageResult<()> {
        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl ArtifactStore for LocalStorage {
    async fn fetch(&self, bucket: &str, file_id: &str) -> StorageResult<Vec<u8>> {
        let path = self.artifact_path(bucket, file_id)?;
        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(file_id.to_string()),
            _ => StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            )),
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            file_id = %file_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage fetch successful"
        );

        Ok(data)
    }

    async fn remove(&self, bucket: &str, file_id: &str) -> StorageResult<()> {
        let path = self.artifact_path(bucket, file_id)?;
        let start = std::time::Instant::now();

        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(file_id.to_string()),
            _ => StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            )),
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            file_id = %file_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn create(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        _content_type: &str,
        _permissions: &[String],
    ) -> StorageResult<String> {
        let path = self.artifact_path(bucket, file_id)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::AlreadyExists(file_id.to_string()),
                _ => StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )),
            })?;

        Self::write_synced(&mut file, &path, &data).await?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            file_id = %file_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage create successful"
        );

        Ok(file_id.to_string())
    }

    /// Write to a sibling temp file, then rename over the artifact.
    async fn replace(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        _content_type: &str,
        _permissions: &[String],
    ) -> StorageResult<String> {
        let path = self.artifact_path(bucket, file_id)?;
        let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_id, Uuid::new_v4()));
        let size = data.len();
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        if let Err(e) = Self::write_synced(&mut file, &tmp_path, &data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move {} over {}: {}",
                tmp_path.display(),
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            file_id = %file_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage atomic replace successful"
        );

        Ok(file_id.to_string())
    }

    fn supports_atomic_replace(&self) -> bool {
        true
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
