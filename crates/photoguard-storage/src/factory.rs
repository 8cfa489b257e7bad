#[cfg(feature = "storage-appwrite")]
use crate::AppwriteStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ArtifactStore, StorageBackend, StorageError, StorageResult};
use photoguard_core::Config;
use std::sync::Arc;

/// Create an artifact store based on configuration
pub async fn create_artifact_store(config: &Config) -> StorageResult<Arc<dyn ArtifactStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-appwrite")]
        StorageBackend::Appwrite => {
            let client = photoguard_api_client::AppwriteClient::from_config(config)
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;
            Ok(Arc::new(AppwriteStorage::new(client)))
        }

        #[cfg(not(feature = "storage-appwrite"))]
        StorageBackend::Appwrite => Err(StorageError::ConfigError(
            "Appwrite storage backend not available (storage-appwrite feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
