// Re-export the wire module from the shared `api-shared` crate so callers can
// reference `api_grpc::pb`.
pub use api_shared::pb;

use api_shared::pb::clinic_server::Clinic;
use api_shared::HealthService;
use clinic_core::wire::multimedia_from_pb;
use clinic_core::{ClinicError, ClinicService};
use tonic::{Request, Response, Status};

/// Maps a clinic error onto the matching gRPC status code.
pub fn status_from_error(err: ClinicError) -> Status {
    match err {
        ClinicError::InvalidInput { msg } => Status::invalid_argument(msg),
        ClinicError::NotFound { msg } => Status::not_found(msg),
    }
}

/// Converts a clinic result into a tonic response.
#[allow(clippy::result_large_err)]
fn respond<T, W>(result: Result<T, ClinicError>) -> Result<Response<W>, Status>
where
    W: From<T>,
{
    result
        .map(|value| Response::new(W::from(value)))
        .map_err(status_from_error)
}

#[derive(Default, Clone)]
pub struct ClinicGrpc {
    clinic_service: ClinicService,
}

impl ClinicGrpc {
    pub fn new(clinic_service: ClinicService) -> Self {
        Self { clinic_service }
    }
}

#[tonic::async_trait]
impl Clinic for ClinicGrpc {
    async fn health(&self, _req: Request<pb::Empty>) -> Result<Response<pb::HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health()))
    }

    async fn register_patient(
        &self,
        req: Request<pb::RegisterPatientReq>,
    ) -> Result<Response<pb::Patient>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.register_patient(
            req.name,
            req.contact_details,
            req.medical_history,
        ))
    }

    async fn get_patient(&self, req: Request<pb::IdReq>) -> Result<Response<pb::Patient>, Status> {
        respond(self.clinic_service.get_patient(req.into_inner().id))
    }

    async fn update_patient(
        &self,
        req: Request<pb::UpdatePatientReq>,
    ) -> Result<Response<pb::Patient>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.update_patient(
            req.id,
            req.name,
            req.contact_details,
            req.medical_history,
        ))
    }

    async fn delete_patient(&self, req: Request<pb::IdReq>) -> Result<Response<pb::Empty>, Status> {
        self.clinic_service
            .delete_patient(req.into_inner().id)
            .map_err(status_from_error)?;
        Ok(Response::new(pb::Empty {}))
    }

    async fn list_patients(
        &self,
        _req: Request<pb::Empty>,
    ) -> Result<Response<pb::ListPatientsRes>, Status> {
        let patients = self
            .clinic_service
            .list_patients()
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(Response::new(pb::ListPatientsRes { patients }))
    }

    async fn schedule_appointment(
        &self,
        req: Request<pb::ScheduleAppointmentReq>,
    ) -> Result<Response<pb::Appointment>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.schedule_appointment(
            req.patient_id,
            req.doctor_id,
            req.date_time,
            req.reason,
            multimedia_from_pb(req.multimedia_content),
        ))
    }

    async fn get_appointment(
        &self,
        req: Request<pb::IdReq>,
    ) -> Result<Response<pb::Appointment>, Status> {
        respond(self.clinic_service.get_appointment(req.into_inner().id))
    }

    async fn update_appointment(
        &self,
        req: Request<pb::UpdateAppointmentReq>,
    ) -> Result<Response<pb::Appointment>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.update_appointment(
            req.id,
            req.patient_id,
            req.doctor_id,
            req.date_time,
            req.reason,
            multimedia_from_pb(req.multimedia_content),
        ))
    }

    async fn delete_appointment(
        &self,
        req: Request<pb::IdReq>,
    ) -> Result<Response<pb::Empty>, Status> {
        self.clinic_service
            .delete_appointment(req.into_inner().id)
            .map_err(status_from_error)?;
        Ok(Response::new(pb::Empty {}))
    }

    async fn list_appointments(
        &self,
        _req: Request<pb::Empty>,
    ) -> Result<Response<pb::ListAppointmentsRes>, Status> {
        let appointments = self
            .clinic_service
            .list_appointments()
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(Response::new(pb::ListAppointmentsRes { appointments }))
    }

    async fn send_message(
        &self,
        req: Request<pb::SendMessageReq>,
    ) -> Result<Response<pb::Message>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.send_message(
            req.sender_id,
            req.receiver_id,
            req.content,
            multimedia_from_pb(req.multimedia_content),
        ))
    }

    async fn send_reminder_to_patient(
        &self,
        req: Request<pb::SendReminderReq>,
    ) -> Result<Response<pb::Message>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.send_reminder_to_patient(
            req.patient_id,
            req.content,
            multimedia_from_pb(req.multimedia_content),
        ))
    }

    async fn get_message(&self, req: Request<pb::IdReq>) -> Result<Response<pb::Message>, Status> {
        respond(self.clinic_service.get_message(req.into_inner().id))
    }

    async fn update_message(
        &self,
        req: Request<pb::UpdateMessageReq>,
    ) -> Result<Response<pb::Message>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.update_message(
            req.id,
            req.sender_id,
            req.receiver_id,
            req.content,
            multimedia_from_pb(req.multimedia_content),
        ))
    }

    async fn delete_message(&self, req: Request<pb::IdReq>) -> Result<Response<pb::Empty>, Status> {
        self.clinic_service
            .delete_message(req.into_inner().id)
            .map_err(status_from_error)?;
        Ok(Response::new(pb::Empty {}))
    }

    async fn list_messages(
        &self,
        _req: Request<pb::Empty>,
    ) -> Result<Response<pb::ListMessagesRes>, Status> {
        let messages = self
            .clinic_service
            .list_messages()
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(Response::new(pb::ListMessagesRes { messages }))
    }

    async fn create_medical_record(
        &self,
        req: Request<pb::CreateMedicalRecordReq>,
    ) -> Result<Response<pb::MedicalRecord>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.create_medical_record(
            req.patient_id,
            req.lab_results,
            req.treatment_history,
        ))
    }

    async fn get_medical_record(
        &self,
        req: Request<pb::IdReq>,
    ) -> Result<Response<pb::MedicalRecord>, Status> {
        respond(self.clinic_service.get_medical_record(req.into_inner().id))
    }

    async fn update_medical_record(
        &self,
        req: Request<pb::UpdateMedicalRecordReq>,
    ) -> Result<Response<pb::MedicalRecord>, Status> {
        let req = req.into_inner();
        respond(self.clinic_service.update_medical_record(
            req.id,
            req.patient_id,
            req.lab_results,
            req.treatment_history,
        ))
    }

    async fn delete_medical_record(
        &self,
        req: Request<pb::IdReq>,
    ) -> Result<Response<pb::Empty>, Status> {
        self.clinic_service
            .delete_medical_record(req.into_inner().id)
            .map_err(status_from_error)?;
        Ok(Response::new(pb::Empty {}))
    }

    async fn list_medical_records(
        &self,
        _req: Request<pb::Empty>,
    ) -> Result<Response<pb::ListMedicalRecordsRes>, Status> {
        let medical_records = self
            .clinic_service
            .list_medical_records()
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(Response::new(pb::ListMedicalRecordsRes { medical_records }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    fn grpc() -> ClinicGrpc {
        ClinicGrpc::default()
    }

    async fn register_alice(svc: &ClinicGrpc) -> pb::Patient {
        svc.register_patient(Request::new(pb::RegisterPatientReq {
            name: "Alice".into(),
            contact_details: "555-0100".into(),
            medical_history: "none".into(),
        }))
        .await
        .unwrap()
        .into_inner()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let res = grpc().health(Request::new(pb::Empty {})).await.unwrap();
        assert!(res.into_inner().ok);
    }

    #[tokio::test]
    async fn test_register_and_get_patient() {
        let svc = grpc();
        let patient = register_alice(&svc).await;
        assert_eq!(patient.id, 1);

        let fetched = svc
            .get_patient(Request::new(pb::IdReq { id: 1 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(fetched, patient);
    }

    #[tokio::test]
    async fn test_schedule_for_unknown_patient_is_not_found() {
        let status = grpc()
            .schedule_appointment(Request::new(pb::ScheduleAppointmentReq {
                patient_id: 42,
                doctor_id: 99,
                date_time: 1_700_000_000,
                reason: "checkup".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "patient with id=42 not found");
    }

    #[tokio::test]
    async fn test_blank_content_is_invalid_argument() {
        let status = grpc()
            .send_message(Request::new(pb::SendMessageReq {
                sender_id: 1,
                receiver_id: 2,
                content: "   ".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_reminder_keeps_multimedia() {
        let svc = grpc();
        let patient = register_alice(&svc).await;

        let message = svc
            .send_reminder_to_patient(Request::new(pb::SendReminderReq {
                patient_id: patient.id,
                content: "Fasting from midnight".into(),
                multimedia_content: Some(pb::MultiMediaContent {
                    audio_url: Some("https://audio.example/prep.mp3".into()),
                    ..Default::default()
                }),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(message.receiver_id, patient.id);
        assert_eq!(message.sender_id, 0);
        assert_eq!(
            message.multimedia_content.unwrap().audio_url.as_deref(),
            Some("https://audio.example/prep.mp3")
        );
    }

    #[tokio::test]
    async fn test_update_patient_replaces_fields() {
        let svc = grpc();
        register_alice(&svc).await;

        let updated = svc
            .update_patient(Request::new(pb::UpdatePatientReq {
                id: 1,
                name: " Alice B. ".into(),
                contact_details: "555-0200".into(),
                medical_history: "asthma".into(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Alice B.");

        let status = svc
            .update_patient(Request::new(pb::UpdatePatientReq {
                id: 9,
                name: "x".into(),
                contact_details: "y".into(),
                medical_history: "z".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_update_appointment_checks_new_patient() {
        let svc = grpc();
        let patient = register_alice(&svc).await;
        let appointment = svc
            .schedule_appointment(Request::new(pb::ScheduleAppointmentReq {
                patient_id: patient.id,
                doctor_id: 99,
                date_time: 1_700_000_000,
                reason: "checkup".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap()
            .into_inner();

        let status = svc
            .update_appointment(Request::new(pb::UpdateAppointmentReq {
                id: appointment.id,
                patient_id: 42,
                doctor_id: 99,
                date_time: 1_700_000_000,
                reason: "checkup".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "patient with id=42 not found");

        let updated = svc
            .update_appointment(Request::new(pb::UpdateAppointmentReq {
                id: appointment.id,
                patient_id: patient.id,
                doctor_id: 98,
                date_time: 1_700_003_600,
                reason: "follow-up".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(updated.doctor_id, 98);
        assert_eq!(updated.date_time, 1_700_003_600);
    }

    #[tokio::test]
    async fn test_update_message_rejects_blank_content() {
        let svc = grpc();
        let message = svc
            .send_message(Request::new(pb::SendMessageReq {
                sender_id: 1,
                receiver_id: 2,
                content: "hello".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap()
            .into_inner();

        let status = svc
            .update_message(Request::new(pb::UpdateMessageReq {
                id: message.id,
                sender_id: 1,
                receiver_id: 2,
                content: "  ".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let updated = svc
            .update_message(Request::new(pb::UpdateMessageReq {
                id: message.id,
                sender_id: 1,
                receiver_id: 3,
                content: "hello again".into(),
                multimedia_content: None,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(updated.receiver_id, 3);
        assert_eq!(updated.content, "hello again");
    }

    #[tokio::test]
    async fn test_update_medical_record() {
        let svc = grpc();
        let patient = register_alice(&svc).await;
        let record = svc
            .create_medical_record(Request::new(pb::CreateMedicalRecordReq {
                patient_id: patient.id,
                lab_results: "CRP 4".into(),
                treatment_history: "none".into(),
            }))
            .await
            .unwrap()
            .into_inner();

        let updated = svc
            .update_medical_record(Request::new(pb::UpdateMedicalRecordReq {
                id: record.id,
                patient_id: patient.id,
                lab_results: "CRP 2".into(),
                treatment_history: "antibiotics".into(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(updated.lab_results, "CRP 2");

        let fetched = svc
            .get_medical_record(Request::new(pb::IdReq { id: record.id }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_delete_patient_and_list() {
        let svc = grpc();
        register_alice(&svc).await;
        register_alice(&svc).await;

        svc.delete_patient(Request::new(pb::IdReq { id: 1 }))
            .await
            .unwrap();
        let listed = svc
            .list_patients(Request::new(pb::Empty {}))
            .await
            .unwrap()
            .into_inner();
        let ids: Vec<u64> = listed.patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_delete_then_list_medical_records() {
        let svc = grpc();
        let patient = register_alice(&svc).await;
        let record = svc
            .create_medical_record(Request::new(pb::CreateMedicalRecordReq {
                patient_id: patient.id,
                lab_results: "CRP 4".into(),
                treatment_history: "none".into(),
            }))
            .await
            .unwrap()
            .into_inner();

        svc.delete_medical_record(Request::new(pb::IdReq { id: record.id }))
            .await
            .unwrap();
        let status = svc
            .delete_medical_record(Request::new(pb::IdReq { id: record.id }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);

        let listed = svc
            .list_medical_records(Request::new(pb::Empty {}))
            .await
            .unwrap()
            .into_inner();
        assert!(listed.medical_records.is_empty());
    }
}
