//! Test helpers: in-memory store and ledger, stub detectors, image fixtures.
//!
//! Run from workspace root: `cargo test -p photoguard-worker`.

#![allow(dead_code)]

pub mod detectors;
pub mod fixtures;
pub mod mock_ledger;
pub mod mock_store;

use std::sync::Arc;

use photoguard_core::Config;
use photoguard_db::StatusLedger;
use photoguard_processing::FaceDetector;
use photoguard_storage::ArtifactStore;
use photoguard_worker::RedactionPipeline;

pub const BUCKET: &str = "photos";

/// Pipeline over the given collaborators with default configuration.
pub fn pipeline(
    store: Arc<dyn ArtifactStore>,
    ledger: Arc<dyn StatusLedger>,
    detector: Arc<dyn FaceDetector>,
) -> RedactionPipeline {
    let config = Config {
        bucket_id: BUCKET.to_string(),
        ..Config::default()
    };
    RedactionPipeline::new(Arc::new(config), store, ledger, detector)
}
