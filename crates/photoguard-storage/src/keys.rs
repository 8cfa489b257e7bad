//! Shared key generation for key-addressed backends (local filesystem, S3).
//!
//! Key format: `{bucket}/{file_id}`. Neither part may be empty, contain a `/`
//! or be a `.`/`..` path component.

use crate::traits::{StorageError, StorageResult};

fn validate_part(kind: &str, value: &str) -> StorageResult<()> {
    if value.is_empty() || value == "." || value == ".." || value.contains('/') || value.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "{} '{}' contains invalid characters",
            kind, value
        )));
    }
    Ok(())
}

/// Generate the storage key for an artifact.
pub fn artifact_key(bucket: &str, file_id: &str) -> StorageResult<String> {
    validate_part("bucket", bucket)?;
    validate_part("file id", file_id)?;
    Ok(format!("{}/{}", bucket, file_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_key() {
        assert_eq!(artifact_key("photos", "abc123").unwrap(), "photos/abc123");
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(matches!(
            artifact_key("photos", ".."),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(artifact_key("photos", "../etc/passwd").is_err());
        assert!(artifact_key("", "abc").is_err());
        assert!(artifact_key("photos", "a\\b").is_err());
    }
}
