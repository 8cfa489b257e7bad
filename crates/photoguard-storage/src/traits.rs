//! Artifact store abstraction trait
//!
//! This module defines the ArtifactStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Artifact store abstraction trait
///
/// The pipeline only ever talks to the external blob store through this trait,
/// so the same orchestration runs against Appwrite, a local directory or S3.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Download the bytes stored under `file_id`.
    ///
    /// Fails with `NotFound` when the identifier does not exist.
    async fn fetch(&self, bucket: &str, file_id: &str) -> StorageResult<Vec<u8>>;

    /// Delete the artifact stored under `file_id`.
    async fn remove(&self, bucket: &str, file_id: &str) -> StorageResult<()>;

    /// Store `data` under `file_id` with the given permissions.
    ///
    /// Returns the identifier the store assigned, which for every backend here
    /// is `file_id` itself.
    async fn create(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        content_type: &str,
        permissions: &[String],
    ) -> StorageResult<String>;

    /// Swap the content stored under `file_id`, keeping the identifier.
    ///
    /// The default is `remove` followed by `create`. Between the two calls the
    /// identifier does not exist and concurrent readers get `NotFound`. If
    /// `create` fails the original bytes are gone.
    async fn replace(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        content_type: &str,
        permissions: &[String],
    ) -> StorageResult<String> {
        tracing::info!(
            bucket = %bucket,
            file_id = %file_id,
            backend = %self.backend_type(),
            "Replacement window opened: artifact deleted before re-create"
        );

        self.remove(bucket, file_id).await?;
        let stored_id = self
            .create(bucket, file_id, data, content_type, permissions)
            .await?;

        tracing::info!(
            bucket = %bucket,
            file_id = %stored_id,
            "Replacement window closed"
        );

        Ok(stored_id)
    }

    /// Whether `replace` swaps content without an absent window.
    fn supports_atomic_replace(&self) -> bool {
        false
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
