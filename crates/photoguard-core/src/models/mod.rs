pub mod job;
pub mod photo;

pub use job::{RedactionJob, RedactionRequest, RedactionResponse};
pub use photo::{PhotoRecordUpdate, ProcessingStatus};
