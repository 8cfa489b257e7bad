use crate::traits::{ArtifactStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use photoguard_api_client::{segment, ApiError, AppwriteClient};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// File object returned by the Appwrite storage API.
#[derive(Debug, Deserialize)]
struct StoredFile {
    #[serde(rename = "$id")]
    id: String,
}

/// Appwrite storage implementation
///
/// Appwrite has no overwrite-by-id, so `replace` keeps the trait's
/// delete-then-create default.
#[derive(Clone, Debug)]
pub struct AppwriteStorage {
    client: AppwriteClient,
}

impl AppwriteStorage {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn file_path(bucket: &str, file_id: &str) -> String {
        format!(
            "/storage/buckets/{}/files/{}",
            segment(bucket),
            segment(file_id)
        )
    }
}

#[async_trait]
impl ArtifactStore for AppwriteStorage {
    async fn fetch(&self, bucket: &str, file_id: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let path = format!("{}/download", Self::file_path(bucket, file_id));

        let data = self.client.get_bytes(&path).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                file_id = %file_id,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Appwrite download failed"
            );
            if e.is_not_found() {
                StorageError::NotFound(file_id.to_string())
            } else {
                StorageError::DownloadFailed(e.to_string())
            }
        })?;

        tracing::info!(
            bucket = %bucket,
            file_id = %file_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Appwrite download successful"
        );

        Ok(data)
    }

    async fn remove(&self, bucket: &str, file_id: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .delete(&Self::file_path(bucket, file_id))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    file_id = %file_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Appwrite delete failed"
                );
                if e.is_not_found() {
                    StorageError::NotFound(file_id.to_string())
                } else {
                    StorageError::DeleteFailed(e.to_string())
                }
            })?;

        tracing::info!(
            bucket = %bucket,
            file_id = %file_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Appwrite delete successful"
        );

        Ok(())
    }

    async fn create(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        content_type: &str,
        permissions: &[String],
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();
        let size = data.len();

        let part = Part::bytes(data)
            .file_name(file_id.to_string())
            .mime_str(content_type)
            .map_err(|e| StorageError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let mut form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);
        for permission in permissions {
            form = form.text("permissions[]", permission.clone());
        }

        let path = format!("/storage/buckets/{}/files", segment(bucket));
        let stored: StoredFile = self
            .client
            .post_multipart(&path, form)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    file_id = %file_id,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Appwrite upload failed"
                );
                match e {
                    ApiError::Status { status: 409, .. } => {
                        StorageError::AlreadyExists(file_id.to_string())
                    }
                    other => StorageError::UploadFailed(other.to_string()),
                }
            })?;

        tracing::info!(
            bucket = %bucket,
            file_id = %stored.id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Appwrite upload successful"
        );

        Ok(stored.id)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Appwrite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn storage(url: &str) -> AppwriteStorage {
        let client = AppwriteClient::new(url, "proj", "key", Duration::from_secs(5)).unwrap();
        AppwriteStorage::new(client)
    }

    #[tokio::test]
    async fn test_fetch_downloads_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/storage/buckets/photos/files/raw1/download")
            .with_status(200)
            .with_body(b"jpeg-bytes")
            .create_async()
            .await;

        let data = storage(&server.url()).fetch("photos", "raw1").await.unwrap();

        assert_eq!(data, b"jpeg-bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_missing_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/storage/buckets/photos/files/gone/download")
            .with_status(404)
            .with_body(r#"{"message":"The requested file could not be found.","code":404}"#)
            .create_async()
            .await;

        let result = storage(&server.url()).fetch("photos", "gone").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_failure_maps_to_delete_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/storage/buckets/photos/files/raw1")
            .with_status(500)
            .with_body(r#"{"message":"Server error","code":500}"#)
            .create_async()
            .await;

        let result = storage(&server.url()).remove("photos", "raw1").await;
        assert!(matches!(result, Err(StorageError::DeleteFailed(_))));
    }

    #[tokio::test]
    async fn test_create_posts_multipart_with_permissions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/buckets/photos/files")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="fileId""#.to_string()),
                Matcher::Regex("raw1".to_string()),
                Matcher::Regex(r#"name="permissions\[\]""#.to_string()),
                Matcher::Regex(r#"read\("any"\)"#.to_string()),
            ]))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"$id":"raw1","bucketId":"photos","sizeOriginal":4}"#)
            .create_async()
            .await;

        let id = storage(&server.url())
            .create(
                "photos",
                "raw1",
                b"data".to_vec(),
                "image/jpeg",
                &[r#"read("any")"#.to_string()],
            )
            .await
            .unwrap();

        assert_eq!(id, "raw1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_default_replace_deletes_then_creates() {
        let mut server = mockito::Server::new_async().await;
        let delete = server
            .mock("DELETE", "/storage/buckets/photos/files/raw1")
            .with_status(204)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/storage/buckets/photos/files")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"$id":"raw1"}"#)
            .create_async()
            .await;

        let store = storage(&server.url());
        let id = store
            .replace("photos", "raw1", b"new".to_vec(), "image/jpeg", &[])
            .await
            .unwrap();

        assert_eq!(id, "raw1");
        assert!(!store.supports_atomic_replace());
        delete.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_stops_when_delete_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/storage/buckets/photos/files/raw1")
            .with_status(500)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/storage/buckets/photos/files")
            .expect(0)
            .create_async()
            .await;

        let result = storage(&server.url())
            .replace("photos", "raw1", b"new".to_vec(), "image/jpeg", &[])
            .await;

        assert!(matches!(result, Err(StorageError::DeleteFailed(_))));
        create.assert_async().await;
    }
}
