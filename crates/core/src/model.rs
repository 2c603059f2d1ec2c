//! Clinic entities.
//!
//! Records hold plain, already-validated values. Construction goes through
//! [`ClinicService`](crate::ClinicService), which checks every field before a
//! record is built.

use serde::{Deserialize, Serialize};

use crate::ids::EntityKind;

/// Optional links to media attached to an appointment or message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMediaContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl MultiMediaContent {
    /// True when no URL is set.
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.audio_url.is_none() && self.video_url.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub contact_details: String,
    pub medical_history: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    /// Opaque; there is no doctor registry to check it against.
    pub doctor_id: u64,
    /// Seconds since the Unix epoch.
    pub date_time: u64,
    pub reason: String,
    #[serde(default)]
    pub multimedia_content: Option<MultiMediaContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: u64,
    pub receiver_id: u64,
    pub content: String,
    #[serde(default)]
    pub multimedia_content: Option<MultiMediaContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: u64,
    pub patient_id: u64,
    pub lab_results: String,
    pub treatment_history: String,
}

/// A record that lives in an [`EntityStore`](crate::store::EntityStore).
pub trait Entity: Clone {
    const KIND: EntityKind;

    fn id(&self) -> u64;

    /// Text fields that must never be blank, by field name.
    fn required_text(&self) -> Vec<(&'static str, &str)>;
}

impl Entity for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn id(&self) -> u64 {
        self.id
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", &self.name),
            ("contact_details", &self.contact_details),
            ("medical_history", &self.medical_history),
        ]
    }
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn id(&self) -> u64 {
        self.id
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("reason", &self.reason)]
    }
}

impl Entity for Message {
    const KIND: EntityKind = EntityKind::Message;

    fn id(&self) -> u64 {
        self.id
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("content", &self.content)]
    }
}

impl Entity for MedicalRecord {
    const KIND: EntityKind = EntityKind::MedicalRecord;

    fn id(&self) -> u64 {
        self.id
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("lab_results", &self.lab_results),
            ("treatment_history", &self.treatment_history),
        ]
    }
}
