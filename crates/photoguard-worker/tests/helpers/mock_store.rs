//! In-memory artifact store with failure injection.

use async_trait::async_trait;
use photoguard_storage::{ArtifactStore, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Failures {
    fetch: bool,
    remove: bool,
    create: bool,
}

/// Artifact store backed by a map; every call is recorded as `op:file_id`.
#[derive(Clone, Default)]
#[allow(clippy::type_complexity)]
pub struct MockArtifactStore {
    files: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<Failures>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, file_id: &str, data: Vec<u8>) {
        self.files
            .lock()
            .unwrap()
            .insert((bucket.to_string(), file_id.to_string()), data);
    }

    pub fn get(&self, bucket: &str, file_id: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), file_id.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_fetch(&self) {
        self.failures.lock().unwrap().fetch = true;
    }

    pub fn fail_remove(&self) {
        self.failures.lock().unwrap().remove = true;
    }

    pub fn fail_create(&self) {
        self.failures.lock().unwrap().create = true;
    }

    fn record(&self, op: &str, file_id: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", op, file_id));
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn fetch(&self, bucket: &str, file_id: &str) -> StorageResult<Vec<u8>> {
        self.record("fetch", file_id);
        if self.failures.lock().unwrap().fetch {
            return Err(StorageError::DownloadFailed("connection reset".to_string()));
        }
        self.get(bucket, file_id)
            .ok_or_else(|| StorageError::NotFound(file_id.to_string()))
    }

    async fn remove(&self, bucket: &str, file_id: &str) -> StorageResult<()> {
        self.record("remove", file_id);
        if self.failures.lock().unwrap().remove {
            return Err(StorageError::DeleteFailed("permission denied".to_string()));
        }
        self.files
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), file_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(file_id.to_string()))
    }

    async fn create(
        &self,
        bucket: &str,
        file_id: &str,
        data: Vec<u8>,
        _content_type: &str,
        _permissions: &[String],
    ) -> StorageResult<String> {
        self.record("create", file_id);
        if self.failures.lock().unwrap().create {
            return Err(StorageError::UploadFailed("quota exceeded".to_string()));
        }
        let key = (bucket.to_string(), file_id.to_string());
        let mut files = self.files.lock().unwrap();
        if files.contains_key(&key) {
            return Err(StorageError::AlreadyExists(file_id.to_string()));
        }
        files.insert(key, data);
        Ok(file_id.to_string())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
