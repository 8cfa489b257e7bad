use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Artifact store backend types
///
/// Defined in core because configuration selects it before any store exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Appwrite,
    Local,
    S3,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "appwrite" => Ok(StorageBackend::Appwrite),
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Appwrite => write!(f, "appwrite"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

/// Status ledger backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    Appwrite,
    /// Only logs updates; for local runs without a document database.
    Log,
}

impl FromStr for LedgerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "appwrite" => Ok(LedgerBackend::Appwrite),
            "log" => Ok(LedgerBackend::Log),
            _ => Err(anyhow::anyhow!("Invalid ledger backend: {}", s)),
        }
    }
}

impl Display for LedgerBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LedgerBackend::Appwrite => write!(f, "appwrite"),
            LedgerBackend::Log => write!(f, "log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse_is_case_insensitive() {
        assert_eq!("Local".parse::<StorageBackend>().unwrap(), StorageBackend::Local);
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("nfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_ledger_backend_display_roundtrip() {
        for backend in [LedgerBackend::Appwrite, LedgerBackend::Log] {
            assert_eq!(backend.to_string().parse::<LedgerBackend>().unwrap(), backend);
        }
    }
}
