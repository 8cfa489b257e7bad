//! Photo processing record repository

use std::sync::Arc;

use async_trait::async_trait;
use photoguard_core::{Config, LedgerBackend, PhotoRecordUpdate};
use thiserror::Error;

use super::log_ledger::LogStatusLedger;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Processing record not found: {0}")]
    NotFound(String),

    #[error("Ledger update failed: {0}")]
    UpdateFailed(String),

    #[error("Ledger configuration error: {0}")]
    Config(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Trait for writes to the photo processing record
///
/// Each call is one partial update of one record; fields absent from the
/// update keep their stored values.
#[async_trait]
pub trait StatusLedger: Send + Sync {
    async fn update_fields(&self, record_id: &str, update: &PhotoRecordUpdate) -> LedgerResult<()>;

    fn backend_type(&self) -> LedgerBackend;
}

#[cfg(feature = "ledger-appwrite")]
pub use appwrite::AppwriteStatusLedger;

#[cfg(feature = "ledger-appwrite")]
mod appwrite {
    use super::*;
    use photoguard_api_client::{segment, AppwriteClient};
    use serde::Serialize;

    #[derive(Serialize)]
    struct DocumentPatch<'a> {
        data: &'a PhotoRecordUpdate,
    }

    /// Appwrite document collection holding one record per photo.
    #[derive(Clone, Debug)]
    pub struct AppwriteStatusLedger {
        client: AppwriteClient,
        database_id: String,
        collection_id: String,
    }

    impl AppwriteStatusLedger {
        pub fn new(
            client: AppwriteClient,
            database_id: impl Into<String>,
            collection_id: impl Into<String>,
        ) -> Self {
            Self {
                client,
                database_id: database_id.into(),
                collection_id: collection_id.into(),
            }
        }

        fn document_path(&self, record_id: &str) -> String {
            format!(
                "/databases/{}/collections/{}/documents/{}",
                segment(&self.database_id),
                segment(&self.collection_id),
                segment(record_id)
            )
        }
    }

    #[async_trait]
    impl StatusLedger for AppwriteStatusLedger {
        #[tracing::instrument(skip(self, update), fields(
            db.system = "appwrite",
            db.name = %self.database_id,
            db.collection = %self.collection_id,
            db.operation = "update",
            status = %update.processing_status
        ))]
        async fn update_fields(
            &self,
            record_id: &str,
            update: &PhotoRecordUpdate,
        ) -> LedgerResult<()> {
            let start = std::time::Instant::now();

            let _: serde_json::Value = self
                .client
                .patch_json(&self.document_path(record_id), &DocumentPatch { data: update })
                .await
                .map_err(|e| {
                    if e.is_not_found() {
                        LedgerError::NotFound(record_id.to_string())
                    } else {
                        LedgerError::UpdateFailed(e.to_string())
                    }
                })?;

            tracing::debug!(
                record_id = %record_id,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Processing record updated"
            );

            Ok(())
        }

        fn backend_type(&self) -> LedgerBackend {
            LedgerBackend::Appwrite
        }
    }
}

/// Create a status ledger based on configuration
pub fn create_status_ledger(config: &Config) -> LedgerResult<Arc<dyn StatusLedger>> {
    match config.ledger_backend {
        #[cfg(feature = "ledger-appwrite")]
        LedgerBackend::Appwrite => {
            let client = photoguard_api_client::AppwriteClient::from_config(config)
                .map_err(|e| LedgerError::Config(e.to_string()))?;
            Ok(Arc::new(AppwriteStatusLedger::new(
                client,
                config.database_id.clone(),
                config.collection_id.clone(),
            )))
        }

        #[cfg(not(feature = "ledger-appwrite"))]
        LedgerBackend::Appwrite => Err(LedgerError::Config(
            "Appwrite ledger backend not available (ledger-appwrite feature not enabled)"
                .to_string(),
        )),

        LedgerBackend::Log => Ok(Arc::new(LogStatusLedger::new())),
    }
}
