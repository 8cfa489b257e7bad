//! Status ledger repositories
//!
//! `photo_status` holds the trait and the Appwrite document repository,
//! `log_ledger` the tracing-only ledger used for local runs.

pub mod log_ledger;
pub mod photo_status;

pub use log_ledger::LogStatusLedger;
#[cfg(feature = "ledger-appwrite")]
pub use photo_status::AppwriteStatusLedger;
pub use photo_status::{create_status_ledger, LedgerError, LedgerResult, StatusLedger};
