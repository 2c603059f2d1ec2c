//! Conversions between clinic entities and the `api-shared` wire messages.

use api_shared::pb;

use crate::model::{Appointment, MedicalRecord, Message, MultiMediaContent, Patient};

impl From<MultiMediaContent> for pb::MultiMediaContent {
    fn from(m: MultiMediaContent) -> Self {
        Self {
            image_url: m.image_url,
            audio_url: m.audio_url,
            video_url: m.video_url,
        }
    }
}

impl From<pb::MultiMediaContent> for MultiMediaContent {
    fn from(m: pb::MultiMediaContent) -> Self {
        Self {
            image_url: m.image_url,
            audio_url: m.audio_url,
            video_url: m.video_url,
        }
    }
}

/// Converts optional wire multimedia into the domain type.
///
/// Blank content is still passed through; the service normalises it.
pub fn multimedia_from_pb(m: Option<pb::MultiMediaContent>) -> Option<MultiMediaContent> {
    m.map(Into::into)
}

impl From<Patient> for pb::Patient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            name: p.name,
            contact_details: p.contact_details,
            medical_history: p.medical_history,
        }
    }
}

impl From<Appointment> for pb::Appointment {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            patient_id: a.patient_id,
            doctor_id: a.doctor_id,
            date_time: a.date_time,
            reason: a.reason,
            multimedia_content: a.multimedia_content.map(Into::into),
        }
    }
}

impl From<Message> for pb::Message {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            content: m.content,
            multimedia_content: m.multimedia_content.map(Into::into),
        }
    }
}

impl From<MedicalRecord> for pb::MedicalRecord {
    fn from(r: MedicalRecord) -> Self {
        Self {
            id: r.id,
            patient_id: r.patient_id,
            lab_results: r.lab_results,
            treatment_history: r.treatment_history,
        }
    }
}
