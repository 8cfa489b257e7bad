use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Lifecycle of one photo's processing record.
///
/// Within a run the status only moves forward:
/// `pending -> processing -> {completed | failed}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    fn rank(self) -> u8 {
        match self {
            ProcessingStatus::Pending => 0,
            ProcessingStatus::Processing => 1,
            ProcessingStatus::Completed | ProcessingStatus::Failed => 2,
        }
    }

    /// Whether moving to `next` keeps the status monotonic.
    pub fn can_transition_to(self, next: ProcessingStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ProcessingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "completed" => Ok(ProcessingStatus::Completed),
            "failed" => Ok(ProcessingStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid processing status: {}", s)),
        }
    }
}

/// Partial update of a photo processing record.
///
/// Only populated fields are serialized, so each update touches exactly the
/// fields its transition owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecordUpdate {
    pub processing_status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces_detected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl PhotoRecordUpdate {
    fn status_only(status: ProcessingStatus) -> Self {
        Self {
            processing_status: status,
            processing_started_at: None,
            processing_completed_at: None,
            faces_detected: None,
            processed_file_id: None,
            bucket_id: None,
            size: None,
        }
    }

    pub fn processing(started_at: DateTime<Utc>) -> Self {
        Self {
            processing_started_at: Some(started_at),
            ..Self::status_only(ProcessingStatus::Processing)
        }
    }

    pub fn failed(completed_at: DateTime<Utc>) -> Self {
        Self {
            processing_completed_at: Some(completed_at),
            ..Self::status_only(ProcessingStatus::Failed)
        }
    }

    /// `size` is only known, and only recorded, when new bytes were stored.
    pub fn completed(
        completed_at: DateTime<Utc>,
        faces_detected: u32,
        processed_file_id: impl Into<String>,
        bucket_id: impl Into<String>,
        size: Option<u64>,
    ) -> Self {
        Self {
            processing_completed_at: Some(completed_at),
            faces_detected: Some(faces_detected),
            processed_file_id: Some(processed_file_id.into()),
            bucket_id: Some(bucket_id.into()),
            size,
            ..Self::status_only(ProcessingStatus::Completed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_is_monotonic() {
        use ProcessingStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Processing));
    }

    #[test]
    fn test_processing_update_serializes_only_its_fields() {
        let started = DateTime::parse_from_rfc3339("2026-10-19T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = serde_json::to_value(PhotoRecordUpdate::processing(started)).unwrap();
        assert_eq!(
            value,
            json!({
                "processingStatus": "processing",
                "processingStartedAt": "2026-10-19T10:00:00Z",
            })
        );
    }

    #[test]
    fn test_completed_update_without_size() {
        let now = Utc::now();
        let value =
            serde_json::to_value(PhotoRecordUpdate::completed(now, 0, "raw1", "photos", None))
                .unwrap();
        assert_eq!(value["processingStatus"], "completed");
        assert_eq!(value["facesDetected"], 0);
        assert_eq!(value["processedFileId"], "raw1");
        assert_eq!(value["bucketId"], "photos");
        assert!(value.get("size").is_none());
        assert!(value.get("processingStartedAt").is_none());
    }

    #[test]
    fn test_completed_update_with_size() {
        let update = PhotoRecordUpdate::completed(Utc::now(), 2, "raw1", "photos", Some(1234));
        let value = serde_json::to_value(update).unwrap();
        assert_eq!(value["size"], 1234);
    }
}
