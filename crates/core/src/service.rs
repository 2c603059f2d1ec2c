//! Clinic operations.
//!
//! [`ClinicService`] is the single entry point used by every API surface. Each
//! operation validates its input, then touches the stores, then returns a
//! [`ClinicResult`]. A failed operation never leaves a partial write behind.
//!
//! ## Locking
//!
//! All stores and the identifier allocator live in one [`Registry`] behind a
//! `RwLock`. Mutations hold the write lock for the whole validate-then-mutate
//! sequence; reads share the read lock.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::CoreConfig;
use crate::error::ClinicResult;
use crate::ids::{EntityKind, IdAllocator};
use crate::model::{Appointment, MedicalRecord, Message, MultiMediaContent, Patient};
use crate::store::EntityStore;
use crate::validation::{normalise_multimedia, require_patient, require_text};

/// Every store plus the allocator that feeds them.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) ids: IdAllocator,
    pub(crate) patients: EntityStore<Patient>,
    pub(crate) appointments: EntityStore<Appointment>,
    pub(crate) messages: EntityStore<Message>,
    pub(crate) medical_records: EntityStore<MedicalRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored for `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Patient => self.patients.len(),
            EntityKind::Appointment => self.appointments.len(),
            EntityKind::Message => self.messages.len(),
            EntityKind::MedicalRecord => self.medical_records.len(),
        }
    }
}

/// Pure clinic data operations - no API concerns.
#[derive(Clone, Debug)]
pub struct ClinicService {
    cfg: Arc<CoreConfig>,
    registry: Arc<RwLock<Registry>>,
}

impl Default for ClinicService {
    fn default() -> Self {
        Self::new(Arc::new(CoreConfig::default()))
    }
}

impl ClinicService {
    /// Creates a service with empty stores and fresh identifier counters.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self::with_registry(cfg, Registry::new())
    }

    pub(crate) fn with_registry(cfg: Arc<CoreConfig>, registry: Registry) -> Self {
        Self {
            cfg,
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    // State is only written after validation succeeds, so a panic in another
    // holder cannot have left it half-updated.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record counts per kind, in [`EntityKind::ALL`] order.
    pub fn counts(&self) -> Vec<(EntityKind, usize)> {
        let registry = self.read();
        EntityKind::ALL
            .iter()
            .map(|&kind| (kind, registry.count(kind)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------

    pub fn register_patient(
        &self,
        name: String,
        contact_details: String,
        medical_history: String,
    ) -> ClinicResult<Patient> {
        let name = require_text("name", name)?;
        let contact_details = require_text("contact_details", contact_details)?;
        let medical_history = require_text("medical_history", medical_history)?;

        let mut registry = self.write();
        let Registry { ids, patients, .. } = &mut *registry;
        let patient = patients.insert(ids, |id| Patient {
            id,
            name,
            contact_details,
            medical_history,
        })?;

        tracing::info!(patient_id = patient.id, "registered patient");
        Ok(patient)
    }

    pub fn get_patient(&self, patient_id: u64) -> ClinicResult<Patient> {
        tracing::debug!(patient_id, "get patient");
        self.read().patients.get(patient_id)
    }

    /// Replaces every mutable field of an existing patient.
    pub fn update_patient(
        &self,
        patient_id: u64,
        name: String,
        contact_details: String,
        medical_history: String,
    ) -> ClinicResult<Patient> {
        let name = require_text("name", name)?;
        let contact_details = require_text("contact_details", contact_details)?;
        let medical_history = require_text("medical_history", medical_history)?;

        let patient = self.write().patients.update(patient_id, |p| {
            p.name = name;
            p.contact_details = contact_details;
            p.medical_history = medical_history;
        })?;

        tracing::info!(patient_id, "updated patient");
        Ok(patient)
    }

    /// Removes a patient. Appointments, messages and records that mention the
    /// patient are left in place.
    pub fn delete_patient(&self, patient_id: u64) -> ClinicResult<()> {
        self.write().patients.delete(patient_id)?;
        tracing::info!(patient_id, "deleted patient");
        Ok(())
    }

    pub fn list_patients(&self) -> Vec<Patient> {
        self.read().patients.list()
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    pub fn schedule_appointment(
        &self,
        patient_id: u64,
        doctor_id: u64,
        date_time: u64,
        reason: String,
        multimedia_content: Option<MultiMediaContent>,
    ) -> ClinicResult<Appointment> {
        let reason = require_text("reason", reason)?;
        let multimedia_content = normalise_multimedia(multimedia_content);

        let mut registry = self.write();
        let Registry {
            ids,
            patients,
            appointments,
            ..
        } = &mut *registry;
        require_patient(patients, patient_id)?;

        let appointment = appointments.insert(ids, |id| Appointment {
            id,
            patient_id,
            doctor_id,
            date_time,
            reason,
            multimedia_content,
        })?;

        tracing::info!(
            appointment_id = appointment.id,
            patient_id,
            doctor_id,
            "scheduled appointment"
        );
        Ok(appointment)
    }

    pub fn get_appointment(&self, appointment_id: u64) -> ClinicResult<Appointment> {
        tracing::debug!(appointment_id, "get appointment");
        self.read().appointments.get(appointment_id)
    }

    /// Replaces every mutable field of an existing appointment.
    ///
    /// The new `patient_id` must resolve, exactly as when scheduling.
    pub fn update_appointment(
        &self,
        appointment_id: u64,
        patient_id: u64,
        doctor_id: u64,
        date_time: u64,
        reason: String,
        multimedia_content: Option<MultiMediaContent>,
    ) -> ClinicResult<Appointment> {
        let reason = require_text("reason", reason)?;
        let multimedia_content = normalise_multimedia(multimedia_content);

        let mut registry = self.write();
        let Registry {
            patients,
            appointments,
            ..
        } = &mut *registry;
        // Unknown appointment takes precedence over unknown patient.
        appointments.get(appointment_id)?;
        require_patient(patients, patient_id)?;

        let appointment = appointments.update(appointment_id, |a| {
            a.patient_id = patient_id;
            a.doctor_id = doctor_id;
            a.date_time = date_time;
            a.reason = reason;
            a.multimedia_content = multimedia_content;
        })?;

        tracing::info!(appointment_id, patient_id, "updated appointment");
        Ok(appointment)
    }

    pub fn delete_appointment(&self, appointment_id: u64) -> ClinicResult<()> {
        self.write().appointments.delete(appointment_id)?;
        tracing::info!(appointment_id, "deleted appointment");
        Ok(())
    }

    pub fn list_appointments(&self) -> Vec<Appointment> {
        self.read().appointments.list()
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Stores a message between two parties. Neither identifier is checked
    /// against the patient store.
    pub fn send_message(
        &self,
        sender_id: u64,
        receiver_id: u64,
        content: String,
        multimedia_content: Option<MultiMediaContent>,
    ) -> ClinicResult<Message> {
        let content = require_text("content", content)?;
        let multimedia_content = normalise_multimedia(multimedia_content);

        let mut registry = self.write();
        let Registry { ids, messages, .. } = &mut *registry;
        let message = messages.insert(ids, |id| Message {
            id,
            sender_id,
            receiver_id,
            content,
            multimedia_content,
        })?;

        tracing::info!(message_id = message.id, sender_id, receiver_id, "sent message");
        Ok(message)
    }

    /// Sends a message from the configured system sender to an existing patient.
    pub fn send_reminder_to_patient(
        &self,
        patient_id: u64,
        content: String,
        multimedia_content: Option<MultiMediaContent>,
    ) -> ClinicResult<Message> {
        let content = require_text("content", content)?;
        let multimedia_content = normalise_multimedia(multimedia_content);
        let sender_id = self.cfg.system_sender_id();

        let mut registry = self.write();
        let Registry {
            ids,
            patients,
            messages,
            ..
        } = &mut *registry;
        require_patient(patients, patient_id)?;

        let message = messages.insert(ids, |id| Message {
            id,
            sender_id,
            receiver_id: patient_id,
            content,
            multimedia_content,
        })?;

        tracing::info!(message_id = message.id, patient_id, "sent reminder");
        Ok(message)
    }

    pub fn get_message(&self, message_id: u64) -> ClinicResult<Message> {
        tracing::debug!(message_id, "get message");
        self.read().messages.get(message_id)
    }

    pub fn update_message(
        &self,
        message_id: u64,
        sender_id: u64,
        receiver_id: u64,
        content: String,
        multimedia_content: Option<MultiMediaContent>,
    ) -> ClinicResult<Message> {
        let content = require_text("content", content)?;
        let multimedia_content = normalise_multimedia(multimedia_content);

        let message = self.write().messages.update(message_id, |m| {
            m.sender_id = sender_id;
            m.receiver_id = receiver_id;
            m.content = content;
            m.multimedia_content = multimedia_content;
        })?;

        tracing::info!(message_id, "updated message");
        Ok(message)
    }

    pub fn delete_message(&self, message_id: u64) -> ClinicResult<()> {
        self.write().messages.delete(message_id)?;
        tracing::info!(message_id, "deleted message");
        Ok(())
    }

    pub fn list_messages(&self) -> Vec<Message> {
        self.read().messages.list()
    }

    // ------------------------------------------------------------------
    // Medical records
    // ------------------------------------------------------------------

    pub fn create_medical_record(
        &self,
        patient_id: u64,
        lab_results: String,
        treatment_history: String,
    ) -> ClinicResult<MedicalRecord> {
        let lab_results = require_text("lab_results", lab_results)?;
        let treatment_history = require_text("treatment_history", treatment_history)?;

        let mut registry = self.write();
        let Registry {
            ids,
            patients,
            medical_records,
            ..
        } = &mut *registry;
        require_patient(patients, patient_id)?;

        let record = medical_records.insert(ids, |id| MedicalRecord {
            id,
            patient_id,
            lab_results,
            treatment_history,
        })?;

        tracing::info!(record_id = record.id, patient_id, "created medical record");
        Ok(record)
    }

    pub fn get_medical_record(&self, record_id: u64) -> ClinicResult<MedicalRecord> {
        tracing::debug!(record_id, "get medical record");
        self.read().medical_records.get(record_id)
    }

    pub fn update_medical_record(
        &self,
        record_id: u64,
        patient_id: u64,
        lab_results: String,
        treatment_history: String,
    ) -> ClinicResult<MedicalRecord> {
        let lab_results = require_text("lab_results", lab_results)?;
        let treatment_history = require_text("treatment_history", treatment_history)?;

        let mut registry = self.write();
        let Registry {
            patients,
            medical_records,
            ..
        } = &mut *registry;
        medical_records.get(record_id)?;
        require_patient(patients, patient_id)?;

        let record = medical_records.update(record_id, |r| {
            r.patient_id = patient_id;
            r.lab_results = lab_results;
            r.treatment_history = treatment_history;
        })?;

        tracing::info!(record_id, patient_id, "updated medical record");
        Ok(record)
    }

    pub fn delete_medical_record(&self, record_id: u64) -> ClinicResult<()> {
        self.write().medical_records.delete(record_id)?;
        tracing::info!(record_id, "deleted medical record");
        Ok(())
    }

    pub fn list_medical_records(&self) -> Vec<MedicalRecord> {
        self.read().medical_records.list()
    }
}
