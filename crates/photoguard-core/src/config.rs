//! Configuration module
//!
//! The configuration is read once at process start and handed to every
//! component by reference. Nothing downstream reads the environment again.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::constants::{
    DEFAULT_DATABASE_ID, DEFAULT_ENDPOINT, DEFAULT_FACE_MODEL_PATH, DEFAULT_PHOTOS_BUCKET_ID,
    DEFAULT_PHOTOS_COLLECTION_ID,
};
use crate::storage_types::{LedgerBackend, StorageBackend};

const SCALE_FACTOR: f32 = 1.1;
const MIN_FACE_SIZE: u32 = 30;
const SCORE_THRESHOLD: f64 = 2.0;
const BLUR_KERNEL_SIZE: u32 = 51;
const BLUR_SIGMA: f32 = 30.0;
const JPEG_QUALITY: u8 = 95;
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Cascade detector tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSettings {
    pub model_path: String,
    /// Step between pyramid levels; must be greater than 1.0.
    pub scale_factor: f32,
    /// Smallest face edge, in pixels, the detector will report.
    pub min_face_size: u32,
    /// Confirmation strength: higher values suppress spurious windows.
    pub score_threshold: f64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_FACE_MODEL_PATH.to_string(),
            scale_factor: SCALE_FACTOR,
            min_face_size: MIN_FACE_SIZE,
            score_threshold: SCORE_THRESHOLD,
        }
    }
}

/// Blur and re-encode tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct RedactionSettings {
    /// Always odd.
    pub kernel_size: u32,
    pub sigma: f32,
    pub jpeg_quality: u8,
}

impl Default for RedactionSettings {
    fn default() -> Self {
        Self {
            kernel_size: BLUR_KERNEL_SIZE,
            sigma: BLUR_SIGMA,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    pub endpoint: String,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub database_id: String,
    pub bucket_id: String,
    pub collection_id: String,
    pub storage_backend: StorageBackend,
    pub ledger_backend: LedgerBackend,
    pub local_storage_path: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub http_timeout_secs: u64,
    pub detection: DetectionSettings,
    pub redaction: RedactionSettings,
    pub environment: String,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("database_id", &self.database_id)
            .field("bucket_id", &self.bucket_id)
            .field("collection_id", &self.collection_id)
            .field("storage_backend", &self.storage_backend)
            .field("ledger_backend", &self.ledger_backend)
            .field("local_storage_path", &self.local_storage_path)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("detection", &self.detection)
            .field("redaction", &self.redaction)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: None,
            api_key: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            bucket_id: DEFAULT_PHOTOS_BUCKET_ID.to_string(),
            collection_id: DEFAULT_PHOTOS_COLLECTION_ID.to_string(),
            storage_backend: StorageBackend::Appwrite,
            ledger_backend: LedgerBackend::Appwrite,
            local_storage_path: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            detection: DetectionSettings::default(),
            redaction: RedactionSettings::default(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Appwrite,
        };
        let ledger_backend = match var("LEDGER_BACKEND") {
            Some(s) => s.parse()?,
            None => LedgerBackend::Appwrite,
        };

        let scale_factor = var("DETECT_SCALE_FACTOR")
            .map(|s| s.parse::<f32>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("DETECT_SCALE_FACTOR must be a number"))?
            .unwrap_or(SCALE_FACTOR);

        let mut kernel_size = var("BLUR_KERNEL_SIZE")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(BLUR_KERNEL_SIZE)
            .max(1);
        if kernel_size % 2 == 0 {
            kernel_size += 1;
        }

        let config = Config {
            endpoint: var("APPWRITE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            project_id: var("APPWRITE_PROJECT_ID"),
            api_key: var("APPWRITE_API_KEY"),
            database_id: var("DATABASE_ID").unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string()),
            bucket_id: var("PHOTOS_BUCKET_ID")
                .unwrap_or_else(|| DEFAULT_PHOTOS_BUCKET_ID.to_string()),
            collection_id: var("PHOTOS_COLLECTION_ID")
                .unwrap_or_else(|| DEFAULT_PHOTOS_COLLECTION_ID.to_string()),
            storage_backend,
            ledger_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
            detection: DetectionSettings {
                model_path: var("FACE_MODEL_PATH")
                    .unwrap_or_else(|| DEFAULT_FACE_MODEL_PATH.to_string()),
                scale_factor,
                min_face_size: var("DETECT_MIN_FACE_SIZE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(MIN_FACE_SIZE),
                score_threshold: var("DETECT_SCORE_THRESHOLD")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(SCORE_THRESHOLD),
            },
            redaction: RedactionSettings {
                kernel_size,
                sigma: var("BLUR_SIGMA")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(BLUR_SIGMA),
                jpeg_quality: var("JPEG_QUALITY")
                    .and_then(|s| s.parse::<u8>().ok())
                    .unwrap_or(JPEG_QUALITY)
                    .clamp(1, 100),
            },
            environment: var("ENVIRONMENT")
                .or_else(|| var("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "APPWRITE_ENDPOINT must be an http(s) URL, got {}",
                self.endpoint
            ));
        }

        let needs_appwrite = self.storage_backend == StorageBackend::Appwrite
            || self.ledger_backend == LedgerBackend::Appwrite;
        if needs_appwrite {
            if self.project_id.is_none() {
                return Err(anyhow::anyhow!(
                    "APPWRITE_PROJECT_ID must be set when using an Appwrite backend"
                ));
            }
            if self.api_key.is_none() {
                return Err(anyhow::anyhow!(
                    "APPWRITE_API_KEY must be set when using an Appwrite backend"
                ));
            }
        }

        match self.storage_backend {
            StorageBackend::Appwrite => {}
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
        }

        if self.detection.scale_factor <= 1.0 {
            return Err(anyhow::anyhow!("DETECT_SCALE_FACTOR must be greater than 1.0"));
        }

        if self.redaction.sigma <= 0.0 {
            return Err(anyhow::anyhow!("BLUR_SIGMA must be positive"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Public view URL for a stored artifact.
    pub fn processed_photo_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view",
            self.endpoint.trim_end_matches('/'),
            self.bucket_id,
            file_id
        )
    }
}
