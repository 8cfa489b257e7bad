//! Best-effort status ledger notifications

use std::sync::Arc;

use photoguard_core::{ErrorMetadata, PhotoRecordUpdate, PipelineError, ProcessingStatus};
use photoguard_db::StatusLedger;

/// Writes one run's status updates to the ledger.
///
/// Failures are logged at warn and dropped; callers never see them. Updates
/// that would move the status backwards (or repeat a terminal status) are
/// skipped, so the record is monotonic within a run.
pub struct LedgerNotifier {
    ledger: Arc<dyn StatusLedger>,
    record_id: String,
    last: Option<ProcessingStatus>,
}

impl LedgerNotifier {
    pub fn new(ledger: Arc<dyn StatusLedger>, record_id: impl Into<String>) -> Self {
        Self {
            ledger,
            record_id: record_id.into(),
            last: None,
        }
    }

    /// Returns whether the ledger accepted the update.
    pub async fn notify(&mut self, update: PhotoRecordUpdate) -> bool {
        let status = update.processing_status;
        if let Some(last) = self.last {
            if !last.can_transition_to(status) {
                tracing::warn!(
                    photo_record_id = %self.record_id,
                    from = %last,
                    to = %status,
                    "Skipping non-monotonic processing record update"
                );
                return false;
            }
        }
        self.last = Some(status);

        match self.ledger.update_fields(&self.record_id, &update).await {
            Ok(()) => {
                tracing::debug!(
                    photo_record_id = %self.record_id,
                    status = %status,
                    "Processing record updated"
                );
                true
            }
            Err(e) => {
                let err = PipelineError::LedgerUpdate(e.to_string());
                tracing::warn!(
                    error = %e,
                    error_code = err.error_code(),
                    photo_record_id = %self.record_id,
                    status = %status,
                    "Processing record update failed; continuing"
                );
                false
            }
        }
    }
}
