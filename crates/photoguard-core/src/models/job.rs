use serde::{Deserialize, Serialize};

use crate::error::{ErrorMetadata, PipelineError};

/// Invocation payload as delivered by the transport layer.
///
/// Every field is optional on the wire; [`RedactionRequest::validate`] turns it
/// into a [`RedactionJob`] or a validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionRequest {
    #[serde(default)]
    pub raw_file_id: Option<String>,
    #[serde(default)]
    pub stall_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub photo_record_id: Option<String>,
}

/// A validated request: both identifiers are present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionJob {
    pub raw_file_id: String,
    pub photo_record_id: String,
    pub stall_id: Option<String>,
    pub user_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RedactionRequest {
    /// `rawFileId` is checked before `photoRecordId`.
    pub fn validate(self) -> Result<RedactionJob, PipelineError> {
        let raw_file_id =
            non_empty(self.raw_file_id).ok_or_else(|| PipelineError::missing_field("rawFileId"))?;
        let photo_record_id = non_empty(self.photo_record_id)
            .ok_or_else(|| PipelineError::missing_field("photoRecordId"))?;

        Ok(RedactionJob {
            raw_file_id,
            photo_record_id,
            stall_id: non_empty(self.stall_id),
            user_id: non_empty(self.user_id),
        })
    }
}

/// Invocation response. Always produced, whatever happened during the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces_detected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RedactionResponse {
    pub fn completed(
        job: &RedactionJob,
        faces_detected: u32,
        processed_file_id: String,
        processed_photo_url: String,
    ) -> Self {
        Self {
            success: true,
            error: None,
            faces_detected: Some(faces_detected),
            raw_file_id: Some(job.raw_file_id.clone()),
            processed_file_id: Some(processed_file_id),
            photo_record_id: Some(job.photo_record_id.clone()),
            processed_photo_url: Some(processed_photo_url),
            message: Some(format!(
                "Successfully processed photo with {} face(s) blurred",
                faces_detected
            )),
        }
    }

    pub fn failure(error: &PipelineError) -> Self {
        Self {
            success: false,
            error: Some(error.client_message()),
            ..Self::default()
        }
    }
}
