//! Pipeline orchestrator
//!
//! Sequences fetch, decode, detect, redact, encode and replace for one
//! invocation and owns the failure contract:
//! - validation errors return before any store or ledger call
//! - a failed `processing` marker never aborts the run
//! - fetch, decode, encode and replace failures mark the record `failed`
//! - ledger failures never change the response
//! - anything unanticipated (a panic in detection, say) becomes an
//!   unexpected error with no ledger write

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use photoguard_core::constants::{PUBLIC_READ_PERMISSION, REDACTED_CONTENT_TYPE};
use photoguard_core::{
    Config, ErrorMetadata, LogLevel, PhotoRecordUpdate, PipelineError, RedactionJob,
    RedactionRequest, RedactionResponse,
};
use photoguard_db::StatusLedger;
use photoguard_processing::{
    decode_image, encode_jpeg, to_grayscale, FaceDetector, GaussianRedactor,
};
use photoguard_storage::ArtifactStore;
use tracing::Instrument;

use crate::notifier::LedgerNotifier;
use crate::stage::Stage;

/// Result of one invocation, with the furthest stage reached.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stage: Stage,
    pub response: RedactionResponse,
    pub error: Option<PipelineError>,
}

/// What a successful run stored.
struct Finished {
    faces_detected: u32,
    processed_file_id: String,
    size: Option<u64>,
}

/// Current stage of a run; every advance is logged.
struct StageTracker {
    stage: Stage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: Stage::Start,
        }
    }

    fn advance(&mut self, next: Stage) {
        if !self.stage.can_advance_to(next) {
            tracing::warn!(from = %self.stage, to = %next, "Unexpected stage transition");
        }
        tracing::debug!(from = %self.stage, stage = %next, "Stage reached");
        self.stage = next;
    }
}

#[derive(Clone)]
pub struct RedactionPipeline {
    config: Arc<Config>,
    store: Arc<dyn ArtifactStore>,
    ledger: Arc<dyn StatusLedger>,
    detector: Arc<dyn FaceDetector>,
    redactor: GaussianRedactor,
}

impl RedactionPipeline {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn ArtifactStore>,
        ledger: Arc<dyn StatusLedger>,
        detector: Arc<dyn FaceDetector>,
    ) -> Self {
        let redactor = GaussianRedactor::from(&config.redaction);
        Self {
            config,
            store,
            ledger,
            detector,
            redactor,
        }
    }

    /// Run one invocation and return the caller-facing response.
    pub async fn handle(&self, request: RedactionRequest) -> RedactionResponse {
        self.run(request).await.response
    }

    /// Run one invocation. Never fails: every error is folded into the
    /// response.
    pub async fn run(&self, request: RedactionRequest) -> RunOutcome {
        let job = match request.validate() {
            Ok(job) => job,
            Err(err) => {
                log_failure(&err, Stage::Start);
                return RunOutcome {
                    stage: Stage::Start,
                    response: RedactionResponse::failure(&err),
                    error: Some(err),
                };
            }
        };

        let span = tracing::info_span!(
            "redaction",
            raw_file_id = %job.raw_file_id,
            photo_record_id = %job.photo_record_id,
            stall_id = ?job.stall_id,
            user_id = ?job.user_id,
        );

        self.run_job(job).instrument(span).await
    }

    async fn run_job(&self, job: RedactionJob) -> RunOutcome {
        let start = std::time::Instant::now();
        let mut tracker = StageTracker::new();
        let mut notifier = LedgerNotifier::new(self.ledger.clone(), job.photo_record_id.clone());

        let result = AssertUnwindSafe(self.execute(&job, &mut tracker, &mut notifier))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(PipelineError::Unexpected(panic_message(panic))));

        match result {
            Ok(finished) => {
                let url = self.config.processed_photo_url(&finished.processed_file_id);
                tracing::info!(
                    faces_detected = finished.faces_detected,
                    processed_file_id = %finished.processed_file_id,
                    size_bytes = ?finished.size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Photo processed"
                );
                RunOutcome {
                    stage: tracker.stage,
                    response: RedactionResponse::completed(
                        &job,
                        finished.faces_detected,
                        finished.processed_file_id,
                        url,
                    ),
                    error: None,
                }
            }
            Err(err) => {
                log_failure(&err, tracker.stage);
                if err.records_failure() {
                    notifier.notify(PhotoRecordUpdate::failed(Utc::now())).await;
                    tracker.advance(Stage::MarkedFailed);
                }
                RunOutcome {
                    stage: tracker.stage,
                    response: RedactionResponse::failure(&err),
                    error: Some(err),
                }
            }
        }
    }

    async fn execute(
        &self,
        job: &RedactionJob,
        tracker: &mut StageTracker,
        notifier: &mut LedgerNotifier,
    ) -> Result<Finished, PipelineError> {
        let bucket = self.config.bucket_id.as_str();

        notifier
            .notify(PhotoRecordUpdate::processing(Utc::now()))
            .await;
        tracker.advance(Stage::MarkedProcessing);

        let raw = self
            .store
            .fetch(bucket, &job.raw_file_id)
            .await
            .map_err(|e| PipelineError::StorageFetch(e.to_string()))?;
        tracker.advance(Stage::Fetched);
        tracing::debug!(size_bytes = raw.len(), "Raw artifact fetched");

        let image = run_blocking(move || {
            decode_image(&raw).map_err(|e| PipelineError::Decode(e.to_string()))
        })
        .await?;
        tracker.advance(Stage::Decoded);

        let detector = self.detector.clone();
        let (image, regions) = run_blocking(move || {
            let regions = detector.detect(&to_grayscale(&image));
            Ok((image, regions))
        })
        .await?;
        tracker.advance(Stage::Detected);

        let faces_detected = regions.len() as u32;
        tracing::info!(
            faces_detected,
            detector = self.detector.name(),
            "Face detection finished"
        );

        if regions.is_empty() {
            tracker.advance(Stage::Unchanged);
            let finished = Finished {
                faces_detected: 0,
                processed_file_id: job.raw_file_id.clone(),
                size: None,
            };
            self.mark_complete(finished, tracker, notifier).await
        } else {
            let redactor = self.redactor.clone();
            let quality = self.config.redaction.jpeg_quality;
            let encoded = run_blocking(move || {
                let mut image = image;
                redactor.redact(&mut image, &regions);
                encode_jpeg(&image, quality).map_err(|e| PipelineError::Encode(e.to_string()))
            })
            .await?;
            tracker.advance(Stage::Redacted);

            let size = encoded.len() as u64;
            let permissions = [PUBLIC_READ_PERMISSION.to_string()];
            let processed_file_id = self
                .store
                .replace(
                    bucket,
                    &job.raw_file_id,
                    encoded,
                    REDACTED_CONTENT_TYPE,
                    &permissions,
                )
                .await
                .map_err(|e| PipelineError::StorageWrite(e.to_string()))?;
            tracker.advance(Stage::Replaced);

            let finished = Finished {
                faces_detected,
                processed_file_id,
                size: Some(size),
            };
            self.mark_complete(finished, tracker, notifier).await
        }
    }

    async fn mark_complete(
        &self,
        finished: Finished,
        tracker: &mut StageTracker,
        notifier: &mut LedgerNotifier,
    ) -> Result<Finished, PipelineError> {
        let update = PhotoRecordUpdate::completed(
            Utc::now(),
            finished.faces_detected,
            finished.processed_file_id.clone(),
            self.config.bucket_id.clone(),
            finished.size,
        );
        if !notifier.notify(update).await {
            tracing::warn!(
                processed_file_id = %finished.processed_file_id,
                "Artifact stored but processing record not marked completed"
            );
        }
        tracker.advance(Stage::MarkedComplete);
        Ok(finished)
    }
}

/// Run CPU-bound image work off the async runtime. A panic inside `f`
/// surfaces as an unexpected error.
async fn run_blocking<T, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(PipelineError::Unexpected(panic_message(e.into_panic()))),
        Err(e) => Err(PipelineError::Unexpected(e.to_string())),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during processing".to_string()
    }
}

fn log_failure(err: &PipelineError, stage: Stage) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            stage = %stage,
            "Redaction request rejected"
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            error_code = err.error_code(),
            stage = %stage,
            "Redaction failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            error_code = err.error_code(),
            stage = %stage,
            "Redaction failed"
        ),
    }
}
