//! Constants used throughout the clinic core crate.

/// Sender identifier stamped on reminders when no other is configured.
pub const DEFAULT_SYSTEM_SENDER_ID: u64 = 0;

/// Snapshot file used by the CLI when `--snapshot` is not given.
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "clinic.json";

/// Version written into every snapshot document.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
