//! Photoguard Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! constants shared by every photoguard component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, DetectionSettings, RedactionSettings};
pub use error::{ErrorMetadata, LogLevel, PipelineError};
pub use models::{
    PhotoRecordUpdate, ProcessingStatus, RedactionJob, RedactionRequest, RedactionResponse,
};
pub use storage_types::{LedgerBackend, StorageBackend};
