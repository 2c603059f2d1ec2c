use serde::{Deserialize, Serialize};

/// Outcome of every clinic operation that can fail.
///
/// Only two kinds exist. Operations never fail for any other reason, and a failed
/// call leaves every store exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClinicError {
    /// Caller-supplied data was malformed or empty.
    #[error("invalid input: {msg}")]
    InvalidInput { msg: String },
    /// A referenced identifier does not resolve to an existing record.
    #[error("not found: {msg}")]
    NotFound { msg: String },
}

impl ClinicError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput { msg: msg.into() }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound { msg: msg.into() }
    }

    /// The human-readable message without the kind prefix.
    pub fn msg(&self) -> &str {
        match self {
            Self::InvalidInput { msg } | Self::NotFound { msg } => msg,
        }
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

/// Failures reading or writing a snapshot file.
///
/// Kept apart from [`ClinicError`] because snapshots are a process concern, not a
/// clinic operation.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write snapshot file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize snapshot: {0}")]
    Deserialization(serde_json::Error),
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = ClinicError::not_found("patient with id=4 not found");
        assert_eq!(err.to_string(), "not found: patient with id=4 not found");
        assert_eq!(err.msg(), "patient with id=4 not found");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let err = ClinicError::invalid_input("name cannot be empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "InvalidInput");
        assert_eq!(json["msg"], "name cannot be empty");
    }
}
