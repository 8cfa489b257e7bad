use async_trait::async_trait;
use photoguard_core::{LedgerBackend, PhotoRecordUpdate};

use super::photo_status::{LedgerResult, StatusLedger};

/// Ledger that only emits each update as a structured log event.
///
/// Used for local runs where no document collection exists. Never fails.
#[derive(Clone, Debug, Default)]
pub struct LogStatusLedger;

impl LogStatusLedger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatusLedger for LogStatusLedger {
    async fn update_fields(&self, record_id: &str, update: &PhotoRecordUpdate) -> LedgerResult<()> {
        tracing::info!(
            record_id = %record_id,
            status = %update.processing_status,
            faces_detected = ?update.faces_detected,
            processed_file_id = ?update.processed_file_id,
            size = ?update.size,
            "Processing record update"
        );
        Ok(())
    }

    fn backend_type(&self) -> LedgerBackend {
        LedgerBackend::Log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_ledger_accepts_every_update() {
        let ledger = LogStatusLedger::new();
        let now = chrono::Utc::now();

        ledger
            .update_fields("rec1", &PhotoRecordUpdate::processing(now))
            .await
            .unwrap();
        ledger
            .update_fields(
                "rec1",
                &PhotoRecordUpdate::completed(now, 0, "raw1", "photos", None),
            )
            .await
            .unwrap();
    }
}
