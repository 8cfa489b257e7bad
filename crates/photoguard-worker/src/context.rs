//! Pipeline construction from configuration
//!
//! The process entrypoint builds one pipeline from the environment-derived
//! configuration and hands it every invocation. Components never read the
//! environment themselves.

use anyhow::{Context, Result};
use std::sync::Arc;

use photoguard_core::Config;
use photoguard_db::create_status_ledger;
use photoguard_processing::{DetectionParams, RustfaceDetector};
use photoguard_storage::create_artifact_store;

use crate::pipeline::RedactionPipeline;

/// Build a pipeline with the store, ledger and detector selected by `config`.
pub async fn build_pipeline(config: Arc<Config>) -> Result<RedactionPipeline> {
    let store = create_artifact_store(&config)
        .await
        .context("Failed to create artifact store")?;
    let ledger = create_status_ledger(&config).context("Failed to create status ledger")?;

    let detection = &config.detection;
    let detector =
        RustfaceDetector::from_path(&detection.model_path, DetectionParams::from(detection))
            .with_context(|| format!("Failed to load face model from {}", detection.model_path))?;

    tracing::info!(
        storage_backend = %store.backend_type(),
        atomic_replace = store.supports_atomic_replace(),
        ledger_backend = %ledger.backend_type(),
        bucket = %config.bucket_id,
        "Redaction pipeline ready"
    );

    Ok(RedactionPipeline::new(config, store, ledger, Arc::new(detector)))
}
