//! Defaults matching the deployed photo service.

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_DATABASE_ID: &str = "lopperater";
pub const DEFAULT_PHOTOS_BUCKET_ID: &str = "photos";
pub const DEFAULT_PHOTOS_COLLECTION_ID: &str = "photos";
pub const DEFAULT_FACE_MODEL_PATH: &str = "model/seeta_fd_frontal_v1.0.bin";

/// Permission granted to every stored artifact: anyone may read it.
pub const PUBLIC_READ_PERMISSION: &str = "read(\"any\")";

/// Content type of re-encoded artifacts.
pub const REDACTED_CONTENT_TYPE: &str = "image/jpeg";
