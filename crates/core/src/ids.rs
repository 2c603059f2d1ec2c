//! Identifier allocation.
//!
//! Every entity kind owns an independent counter. Issued identifiers start at 1 and
//! only ever grow, so a deleted record's identifier is never handed out again.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// The kinds of entity the clinic stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Patient,
    Appointment,
    Message,
    MedicalRecord,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Patient,
        EntityKind::Appointment,
        EntityKind::Message,
        EntityKind::MedicalRecord,
    ];

    /// Lowercase label used in log lines and error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Patient => "patient",
            EntityKind::Appointment => "appointment",
            EntityKind::Message => "message",
            EntityKind::MedicalRecord => "medical record",
        }
    }

    fn slot(self) -> usize {
        match self {
            EntityKind::Patient => 0,
            EntityKind::Appointment => 1,
            EntityKind::Message => 2,
            EntityKind::MedicalRecord => 3,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-kind monotonic identifier source.
///
/// Counters are atomics so concurrent callers can never observe the same value,
/// even without the service-level lock.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last_issued: [AtomicU64; 4],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next identifier for `kind`.
    ///
    /// Returns `None` once the counter has reached `u64::MAX`; the counter is left there
    /// rather than wrapping back to identifiers that were already issued.
    pub fn next_id(&self, kind: EntityKind) -> Option<u64> {
        self.last_issued[kind.slot()]
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .ok()
            .map(|last| last + 1)
    }

    /// The most recently issued identifier for `kind`, or 0 if none was issued.
    pub fn last_issued(&self, kind: EntityKind) -> u64 {
        self.last_issued[kind.slot()].load(Ordering::SeqCst)
    }

    /// Raises the counter for `kind` to at least `value`. Never moves it backwards.
    pub fn restore(&self, kind: EntityKind, value: u64) {
        self.last_issued[kind.slot()].fetch_max(value, Ordering::SeqCst);
    }
}
