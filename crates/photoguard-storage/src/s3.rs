use crate::keys::artifact_key;
use crate::traits::{ArtifactStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

/// S3 storage implementation
///
/// Objects are keyed `{bucket}/{file_id}` inside one S3 bucket. A single PUT
/// overwrites an object in place, so `replace` never leaves the key absent.
/// Permissions are governed by the bucket policy and are not applied per
/// object.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    async fn put(&self, key: &str, data: Vec<u8>, operation: &str) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                operation = operation,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            operation = operation,
            "S3 upload successful"
        );

        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for S3Storage {
    async fn fetch(&self, bucket: &str, file_id: &str) -> StorageResult<Vec<u8>> {
        let key = artifact_key(bucket, file_id)?;
        let start = std::time::Instant::now();
        let location = Path::from(key.clone());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(file_id.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn remove(&self, bucket: &str, file_id: &str) -> StorageResult<()> {
        let key = artifact_key(bucket, file_id)?;
        let start = std::time::Instant::now();
        let location = Path::from(key.clone());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(file_id.to_string()),
                other => StorageError::DeleteFailed(other.to_string()),
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
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
        let key = artifact_key(bucket, file_id)?;
        self.put(&key, data, "create").await?;
        Ok(file_id.to_string())
    }

    async fn replace(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        _content_type: &str,
        _permissions: &[String],
    ) -> StorageResult<String> {
        let key = artifact_key(bucket, file_id)?;
        self.put(&key, data, "replace").await?;
        Ok(file_id.to_string())
    }

    fn supports_atomic_replace(&self) -> bool {
        true
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(all(test, feature = "storage-s3"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_storage_reports_atomic_replace() {
        let storage = S3Storage::new(
            "photoguard-test".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert!(storage.supports_atomic_replace());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_before_request() {
        let storage = S3Storage::new(
            "photoguard-test".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
        .await
        .unwrap();

        let result = storage.fetch("photos", "..").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
