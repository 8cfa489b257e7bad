//! In-memory status ledger recording every update.

use async_trait::async_trait;
use photoguard_core::{LedgerBackend, PhotoRecordUpdate, ProcessingStatus};
use photoguard_db::{LedgerError, LedgerResult, StatusLedger};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockStatusLedger {
    updates: Arc<Mutex<Vec<(String, PhotoRecordUpdate)>>>,
    failing: Arc<Mutex<Vec<ProcessingStatus>>>,
}

impl MockStatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every update carrying `status` (attempts are still recorded).
    pub fn fail_on(&self, status: ProcessingStatus) {
        self.failing.lock().unwrap().push(status);
    }

    pub fn fail_all(&self) {
        let mut failing = self.failing.lock().unwrap();
        failing.extend([
            ProcessingStatus::Processing,
            ProcessingStatus::Completed,
            ProcessingStatus::Failed,
        ]);
    }

    pub fn updates(&self) -> Vec<(String, PhotoRecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<ProcessingStatus> {
        self.updates()
            .into_iter()
            .map(|(_, update)| update.processing_status)
            .collect()
    }

    pub fn last(&self) -> Option<PhotoRecordUpdate> {
        self.updates().into_iter().last().map(|(_, update)| update)
    }
}

#[async_trait]
impl StatusLedger for MockStatusLedger {
    async fn update_fields(&self, record_id: &str, update: &PhotoRecordUpdate) -> LedgerResult<()> {
        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), update.clone()));
        if self
            .failing
            .lock()
            .unwrap()
            .contains(&update.processing_status)
        {
            return Err(LedgerError::UpdateFailed("service unavailable".to_string()));
        }
        Ok(())
    }

    fn backend_type(&self) -> LedgerBackend {
        LedgerBackend::Log
    }
}
