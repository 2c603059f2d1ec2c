//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! [`ClinicService`](crate::ClinicService). Request handling never reads the
//! environment.

use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_SYSTEM_SENDER_ID;
use crate::error::{ClinicError, ClinicResult};
use crate::validation::parse_id;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    snapshot_path: Option<PathBuf>,
    system_sender_id: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            system_sender_id: DEFAULT_SYSTEM_SENDER_ID,
        }
    }
}

impl CoreConfig {
    pub fn new(snapshot_path: Option<PathBuf>, system_sender_id: u64) -> ClinicResult<Self> {
        if let Some(path) = &snapshot_path {
            if path.as_os_str().is_empty() || path.is_dir() {
                return Err(ClinicError::invalid_input(format!(
                    "snapshot path must name a file, got {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            snapshot_path,
            system_sender_id,
        })
    }

    /// Builds the configuration from raw environment values.
    ///
    /// Blank values count as unset.
    pub fn from_env_values(
        snapshot_path: Option<String>,
        system_sender_id: Option<String>,
    ) -> ClinicResult<Self> {
        let snapshot_path = snapshot_path
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let system_sender_id = system_sender_id_from_env_value(system_sender_id)?;

        Self::new(snapshot_path, system_sender_id)
    }

    /// Where the runner loads and saves its snapshot, if anywhere.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Sender identifier used for reminders.
    pub fn system_sender_id(&self) -> u64 {
        self.system_sender_id
    }
}

/// Parse the reminder sender identifier from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SYSTEM_SENDER_ID`].
pub fn system_sender_id_from_env_value(value: Option<String>) -> ClinicResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => parse_id("CLINIC_SYSTEM_SENDER_ID", &v),
        None => Ok(DEFAULT_SYSTEM_SENDER_ID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sender_id_defaults_when_unset_or_blank() {
        assert_eq!(system_sender_id_from_env_value(None).unwrap(), 0);
        assert_eq!(
            system_sender_id_from_env_value(Some("  ".into())).unwrap(),
            0
        );
    }

    #[test]
    fn test_sender_id_parses_value() {
        assert_eq!(
            system_sender_id_from_env_value(Some(" 900 ".into())).unwrap(),
            900
        );
    }

    #[test]
    fn test_sender_id_rejects_garbage() {
        let err = system_sender_id_from_env_value(Some("system".into())).unwrap_err();
        assert!(err.msg().contains("CLINIC_SYSTEM_SENDER_ID"));
    }

    #[test]
    fn test_from_env_values_treats_blank_path_as_unset() {
        let cfg = CoreConfig::from_env_values(Some("".into()), None).unwrap();
        assert_eq!(cfg.snapshot_path(), None);
        assert_eq!(cfg, CoreConfig::default());
    }

    #[test]
    fn test_snapshot_path_must_not_be_directory() {
        let dir = TempDir::new().unwrap();
        let result = CoreConfig::new(Some(dir.path().to_path_buf()), 0);
        assert!(matches!(result, Err(ClinicError::InvalidInput { .. })));
    }
}
