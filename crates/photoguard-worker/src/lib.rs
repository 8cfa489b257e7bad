//! Redaction pipeline orchestrator
//!
//! One invocation takes a photo reference, blurs every detected face and
//! swaps the stored bytes under the same identifier, recording progress on
//! the photo's processing record. The ledger is written best-effort: its
//! failures are logged and never change the response.

pub mod context;
pub mod notifier;
pub mod pipeline;
pub mod stage;

pub use context::build_pipeline;
pub use notifier::LedgerNotifier;
pub use pipeline::{RedactionPipeline, RunOutcome};
pub use stage::Stage;
