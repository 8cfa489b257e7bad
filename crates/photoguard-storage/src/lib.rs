//! Photoguard Storage Library
//!
//! This crate provides the artifact store abstraction and its backends. An
//! artifact is the stored byte content of one photograph, addressed by a
//! `(bucket, file_id)` pair.
//!
//! # Replacement
//!
//! Swapping an artifact's content while keeping its identifier goes through
//! [`ArtifactStore::replace`]. The default implementation deletes and then
//! creates, leaving a window during which the identifier resolves to nothing.
//! Backends that can overwrite in place (local filesystem, S3) override it and
//! report so through [`ArtifactStore::supports_atomic_replace`].

#[cfg(feature = "storage-appwrite")]
pub mod appwrite;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-appwrite")]
pub use appwrite::AppwriteStorage;
pub use factory::create_artifact_store;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use photoguard_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ArtifactStore, StorageError, StorageResult};
