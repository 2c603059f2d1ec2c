//! JSON snapshots of the whole registry.
//!
//! A snapshot carries every record plus the last identifier issued per kind, so a
//! service restored from it keeps the no-reuse guarantee across restarts.
//!
//! Files are written to a sibling temporary path and renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::constants::SNAPSHOT_FORMAT_VERSION;
use crate::error::{SnapshotError, SnapshotResult};
use crate::ids::EntityKind;
use crate::model::{Appointment, Entity, MedicalRecord, Message, Patient};
use crate::service::{ClinicService, Registry};
use crate::store::EntityStore;
use crate::validation::NonEmptyText;

/// Last identifier issued for each kind at the time of the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastIssuedIds {
    pub patient: u64,
    pub appointment: u64,
    pub message: u64,
    pub medical_record: u64,
}

impl LastIssuedIds {
    fn get(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Patient => self.patient,
            EntityKind::Appointment => self.appointment,
            EntityKind::Message => self.message,
            EntityKind::MedicalRecord => self.medical_record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub last_issued_ids: LastIssuedIds,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub medical_records: Vec<MedicalRecord>,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn read_from(path: &Path) -> SnapshotResult<Self> {
        let contents = fs::read_to_string(path).map_err(SnapshotError::FileRead)?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(SnapshotError::Deserialization)?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::Inconsistent(format!(
                "unsupported snapshot format version {}",
                snapshot.format_version
            )));
        }
        Ok(snapshot)
    }

    /// Writes the snapshot as pretty-printed JSON, replacing `path` atomically.
    pub fn write_to(&self, path: &Path) -> SnapshotResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(SnapshotError::Serialization)?;

        let tmp = tmp_path(path);
        fs::write(&tmp, json).map_err(SnapshotError::FileWrite)?;
        fs::rename(&tmp, path).map_err(SnapshotError::FileWrite)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Rebuilds one store from snapshot records.
///
/// Records get the same non-blank text check as live writes. Dangling `patient_id`
/// references are accepted: deleting a patient leaves their records in place.
fn restore_store<T: Entity>(records: Vec<T>) -> SnapshotResult<EntityStore<T>> {
    let mut store = EntityStore::new();
    for record in records {
        let id = record.id();
        if id == 0 || id == u64::MAX {
            return Err(SnapshotError::Inconsistent(format!(
                "{} with id={} cannot exist",
                T::KIND,
                id
            )));
        }
        for (field, value) in record.required_text() {
            NonEmptyText::new(field, value).map_err(|err| {
                SnapshotError::Inconsistent(format!("{} id={}: {}", T::KIND, id, err.msg()))
            })?;
        }
        if !store.restore(record) {
            return Err(SnapshotError::Inconsistent(format!(
                "duplicate {} id={}",
                T::KIND,
                id
            )));
        }
    }
    Ok(store)
}

impl Registry {
    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            saved_at: Utc::now(),
            last_issued_ids: LastIssuedIds {
                patient: self.ids.last_issued(EntityKind::Patient),
                appointment: self.ids.last_issued(EntityKind::Appointment),
                message: self.ids.last_issued(EntityKind::Message),
                medical_record: self.ids.last_issued(EntityKind::MedicalRecord),
            },
            patients: self.patients.list(),
            appointments: self.appointments.list(),
            messages: self.messages.list(),
            medical_records: self.medical_records.list(),
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> SnapshotResult<Self> {
        for kind in EntityKind::ALL {
            if snapshot.last_issued_ids.get(kind) == u64::MAX {
                return Err(SnapshotError::Inconsistent(format!(
                    "{kind} identifier counter is exhausted"
                )));
            }
        }

        let registry = Registry {
            ids: Default::default(),
            patients: restore_store(snapshot.patients)?,
            appointments: restore_store(snapshot.appointments)?,
            messages: restore_store(snapshot.messages)?,
            medical_records: restore_store(snapshot.medical_records)?,
        };

        // Counters never fall below a stored id, even if the recorded value is stale.
        for kind in EntityKind::ALL {
            let highest_stored = match kind {
                EntityKind::Patient => registry.patients.max_id(),
                EntityKind::Appointment => registry.appointments.max_id(),
                EntityKind::Message => registry.messages.max_id(),
                EntityKind::MedicalRecord => registry.medical_records.max_id(),
            };
            registry.ids.restore(kind, snapshot.last_issued_ids.get(kind));
            registry.ids.restore(kind, highest_stored.unwrap_or(0));
        }

        Ok(registry)
    }
}

impl ClinicService {
    /// Captures every record and identifier counter.
    pub fn snapshot(&self) -> Snapshot {
        self.read().to_snapshot()
    }

    /// Builds a service whose stores and counters come from `snapshot`.
    pub fn from_snapshot(cfg: Arc<CoreConfig>, snapshot: Snapshot) -> SnapshotResult<Self> {
        let registry = Registry::from_snapshot(snapshot)?;
        Ok(Self::with_registry(cfg, registry))
    }

    /// Builds a service from the configured snapshot file.
    ///
    /// Starts empty when no path is configured or the file does not exist yet.
    pub fn load(cfg: Arc<CoreConfig>) -> SnapshotResult<Self> {
        match cfg.snapshot_path() {
            Some(path) if path.exists() => {
                let snapshot = Snapshot::read_from(path)?;
                tracing::info!(path = %path.display(), "loaded snapshot");
                Self::from_snapshot(cfg.clone(), snapshot)
            }
            _ => Ok(Self::new(cfg)),
        }
    }

    /// Writes the current state to `path`.
    pub fn save_snapshot(&self, path: &Path) -> SnapshotResult<()> {
        self.snapshot().write_to(path)?;
        tracing::info!(path = %path.display(), "saved snapshot");
        Ok(())
    }
}
