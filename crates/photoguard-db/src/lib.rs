//! Photoguard Status Ledger Library
//!
//! Repositories for the per-photo processing record. The record lives in an
//! external document collection; this crate only writes partial updates to it.

pub mod db;

pub use db::{create_status_ledger, LedgerError, LedgerResult, LogStatusLedger, StatusLedger};
#[cfg(feature = "ledger-appwrite")]
pub use db::AppwriteStatusLedger;
