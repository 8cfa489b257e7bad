//! Error types module
//!
//! `PipelineError` is the taxonomy every redaction run reports through. Each
//! variant describes itself through `ErrorMetadata`: how it is logged, what the
//! caller sees, and whether the run's ledger record is marked `failed`.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues and bad input
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "STORAGE_FETCH_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message placed in the `error` field of the response
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Whether the status ledger should be moved to `failed` for this error
    fn records_failure(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// A required request field is missing. Raised before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage fetch error: {0}")]
    StorageFetch(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    /// Covers both the delete and the create half of a replacement.
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Never aborts a run; only used to describe ledger failures in logs.
    #[error("Ledger update error: {0}")]
    LedgerUpdate(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn missing_field(field: &str) -> Self {
        PipelineError::Validation(format!("{} is required", field))
    }
}

impl ErrorMetadata for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "VALIDATION_ERROR",
            PipelineError::StorageFetch(_) => "STORAGE_FETCH_ERROR",
            PipelineError::Decode(_) => "DECODE_ERROR",
            PipelineError::Encode(_) => "ENCODE_ERROR",
            PipelineError::StorageWrite(_) => "STORAGE_WRITE_ERROR",
            PipelineError::LedgerUpdate(_) => "LEDGER_UPDATE_ERROR",
            PipelineError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            PipelineError::Validation(msg) => msg.clone(),
            PipelineError::StorageFetch(cause) => {
                format!("Failed to download raw file: {}", cause)
            }
            PipelineError::Decode(_) => "Invalid image format".to_string(),
            PipelineError::Encode(_) => "Failed to encode processed image".to_string(),
            PipelineError::StorageWrite(cause) => format!("Failed to replace image: {}", cause),
            PipelineError::LedgerUpdate(cause) => {
                format!("Failed to update processing record: {}", cause)
            }
            PipelineError::Unexpected(cause) => format!("Unexpected error: {}", cause),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::Validation(_) => LogLevel::Debug,
            PipelineError::Decode(_) | PipelineError::LedgerUpdate(_) => LogLevel::Warn,
            PipelineError::StorageFetch(_)
            | PipelineError::Encode(_)
            | PipelineError::StorageWrite(_)
            | PipelineError::Unexpected(_) => LogLevel::Error,
        }
    }

    fn records_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::StorageFetch(_)
                | PipelineError::Decode(_)
                | PipelineError::Encode(_)
                | PipelineError::StorageWrite(_)
        )
    }
}
