//! # API REST
//!
//! REST API implementation for the clinic service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for the JSON body types and `clinic-core` for every operation.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{pb, HealthService};
use clinic_core::validation::parse_id;
use clinic_core::wire::multimedia_from_pb;
use clinic_core::{ClinicError, ClinicService};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub clinic_service: ClinicService,
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// `InvalidInput` or `NotFound`.
    pub kind: String,
    pub msg: String,
}

/// A clinic error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(ClinicError);

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            ClinicError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "InvalidInput"),
            ClinicError::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFound"),
        };
        let body = ErrorRes {
            kind: kind.to_string(),
            msg: self.0.msg().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ClinicError::invalid_input(rejection.body_text()))
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// `Json` extractor whose rejections are reported as `InvalidInput`.
///
/// Covers a missing content type, malformed JSON, missing fields and identifiers that
/// are not valid u64 values.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct JsonBody<T>(T);

fn path_id(raw: &str) -> ApiResult<u64> {
    Ok(parse_id("id", raw)?)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        register_patient,
        get_patient,
        update_patient,
        delete_patient,
        list_patients,
        schedule_appointment,
        get_appointment,
        update_appointment,
        delete_appointment,
        list_appointments,
        send_message,
        send_reminder_to_patient,
        get_message,
        update_message,
        delete_message,
        list_messages,
        create_medical_record,
        get_medical_record,
        update_medical_record,
        delete_medical_record,
        list_medical_records,
    ),
    components(schemas(
        ErrorRes,
        pb::HealthRes,
        pb::MultiMediaContent,
        pb::Patient,
        pb::RegisterPatientReq,
        pb::UpdatePatientReq,
        pb::ListPatientsRes,
        pb::Appointment,
        pb::ScheduleAppointmentReq,
        pb::UpdateAppointmentReq,
        pb::ListAppointmentsRes,
        pb::Message,
        pb::SendMessageReq,
        pb::SendReminderReq,
        pb::UpdateMessageReq,
        pb::ListMessagesRes,
        pb::MedicalRecord,
        pb::CreateMedicalRecordReq,
        pb::UpdateMedicalRecordReq,
        pb::ListMedicalRecordsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router, including Swagger UI, over `clinic_service`.
pub fn router(clinic_service: ClinicService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(register_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/patients/:id/reminders", post(send_reminder_to_patient))
        .route(
            "/appointments",
            get(list_appointments).post(schedule_appointment),
        )
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/messages", get(list_messages).post(send_message))
        .route(
            "/messages/:id",
            get(get_message).put(update_message).delete(delete_message),
        )
        .route(
            "/medical-records",
            get(list_medical_records).post(create_medical_record),
        )
        .route(
            "/medical-records/:id",
            get(get_medical_record)
                .put(update_medical_record)
                .delete(delete_medical_record),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { clinic_service })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health(State(_state): State<AppState>) -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/patients",
    request_body = pb::RegisterPatientReq,
    responses(
        (status = 201, description = "Patient registered", body = pb::Patient),
        (status = 400, description = "A text field is blank", body = ErrorRes)
    )
)]
/// Register a new patient
///
/// All three text fields must contain non-whitespace text; stored values are trimmed.
async fn register_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<pb::RegisterPatientReq>,
) -> ApiResult<(StatusCode, Json<pb::Patient>)> {
    let patient =
        state
            .clinic_service
            .register_patient(req.name, req.contact_details, req.medical_history)?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient", body = pb::Patient),
        (status = 400, description = "Identifier is not a u64", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<pb::Patient>> {
    let patient = state.clinic_service.get_patient(path_id(&id)?)?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    request_body = pb::UpdatePatientReq,
    responses(
        (status = 200, description = "Updated patient", body = pb::Patient),
        (status = 400, description = "Invalid identifier or blank field", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
/// Replace a patient's name, contact details and medical history
///
/// The identifier in the path wins over any `id` in the body.
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<pb::UpdatePatientReq>,
) -> ApiResult<Json<pb::Patient>> {
    let patient = state.clinic_service.update_patient(
        path_id(&id)?,
        req.name,
        req.contact_details,
        req.medical_history,
    )?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient identifier")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.clinic_service.delete_patient(path_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients in registration order", body = pb::ListPatientsRes)
    )
)]
async fn list_patients(State(state): State<AppState>) -> Json<pb::ListPatientsRes> {
    let patients = state
        .clinic_service
        .list_patients()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(pb::ListPatientsRes { patients })
}

#[utoipa::path(
    post,
    path = "/patients/{id}/reminders",
    params(("id" = u64, Path, description = "Patient identifier")),
    request_body = pb::SendReminderReq,
    responses(
        (status = 201, description = "Reminder sent", body = pb::Message),
        (status = 400, description = "Invalid identifier or blank content", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
/// Send a reminder from the system sender to a patient
async fn send_reminder_to_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<pb::SendReminderReq>,
) -> ApiResult<(StatusCode, Json<pb::Message>)> {
    let message = state.clinic_service.send_reminder_to_patient(
        path_id(&id)?,
        req.content,
        multimedia_from_pb(req.multimedia_content),
    )?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = pb::ScheduleAppointmentReq,
    responses(
        (status = 201, description = "Appointment scheduled", body = pb::Appointment),
        (status = 400, description = "Blank reason", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
/// Schedule an appointment for an existing patient
async fn schedule_appointment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<pb::ScheduleAppointmentReq>,
) -> ApiResult<(StatusCode, Json<pb::Appointment>)> {
    let appointment = state.clinic_service.schedule_appointment(
        req.patient_id,
        req.doctor_id,
        req.date_time,
        req.reason,
        multimedia_from_pb(req.multimedia_content),
    )?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Appointment", body = pb::Appointment),
        (status = 404, description = "No such appointment", body = ErrorRes)
    )
)]
async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<pb::Appointment>> {
    let appointment = state.clinic_service.get_appointment(path_id(&id)?)?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment identifier")),
    request_body = pb::UpdateAppointmentReq,
    responses(
        (status = 200, description = "Updated appointment", body = pb::Appointment),
        (status = 400, description = "Invalid identifier or blank reason", body = ErrorRes),
        (status = 404, description = "No such appointment or patient", body = ErrorRes)
    )
)]
async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<pb::UpdateAppointmentReq>,
) -> ApiResult<Json<pb::Appointment>> {
    let appointment = state.clinic_service.update_appointment(
        path_id(&id)?,
        req.patient_id,
        req.doctor_id,
        req.date_time,
        req.reason,
        multimedia_from_pb(req.multimedia_content),
    )?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment identifier")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "No such appointment", body = ErrorRes)
    )
)]
async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.clinic_service.delete_appointment(path_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "All appointments", body = pb::ListAppointmentsRes)
    )
)]
async fn list_appointments(State(state): State<AppState>) -> Json<pb::ListAppointmentsRes> {
    let appointments = state
        .clinic_service
        .list_appointments()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(pb::ListAppointmentsRes { appointments })
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/messages",
    request_body = pb::SendMessageReq,
    responses(
        (status = 201, description = "Message sent", body = pb::Message),
        (status = 400, description = "Blank content", body = ErrorRes)
    )
)]
async fn send_message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<pb::SendMessageReq>,
) -> ApiResult<(StatusCode, Json<pb::Message>)> {
    let message = state.clinic_service.send_message(
        req.sender_id,
        req.receiver_id,
        req.content,
        multimedia_from_pb(req.multimedia_content),
    )?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message", body = pb::Message),
        (status = 404, description = "No such message", body = ErrorRes)
    )
)]
async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<pb::Message>> {
    let message = state.clinic_service.get_message(path_id(&id)?)?;
    Ok(Json(message.into()))
}

#[utoipa::path(
    put,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message identifier")),
    request_body = pb::UpdateMessageReq,
    responses(
        (status = 200, description = "Updated message", body = pb::Message),
        (status = 400, description = "Invalid identifier or blank content", body = ErrorRes),
        (status = 404, description = "No such message", body = ErrorRes)
    )
)]
async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<pb::UpdateMessageReq>,
) -> ApiResult<Json<pb::Message>> {
    let message = state.clinic_service.update_message(
        path_id(&id)?,
        req.sender_id,
        req.receiver_id,
        req.content,
        multimedia_from_pb(req.multimedia_content),
    )?;
    Ok(Json(message.into()))
}

#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message identifier")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "No such message", body = ErrorRes)
    )
)]
async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.clinic_service.delete_message(path_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "All messages", body = pb::ListMessagesRes)
    )
)]
async fn list_messages(State(state): State<AppState>) -> Json<pb::ListMessagesRes> {
    let messages = state
        .clinic_service
        .list_messages()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(pb::ListMessagesRes { messages })
}

// ---------------------------------------------------------------------------
// Medical records
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/medical-records",
    request_body = pb::CreateMedicalRecordReq,
    responses(
        (status = 201, description = "Medical record created", body = pb::MedicalRecord),
        (status = 400, description = "Blank field", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
async fn create_medical_record(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<pb::CreateMedicalRecordReq>,
) -> ApiResult<(StatusCode, Json<pb::MedicalRecord>)> {
    let record = state.clinic_service.create_medical_record(
        req.patient_id,
        req.lab_results,
        req.treatment_history,
    )?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/medical-records/{id}",
    params(("id" = u64, Path, description = "Medical record identifier")),
    responses(
        (status = 200, description = "Medical record", body = pb::MedicalRecord),
        (status = 404, description = "No such medical record", body = ErrorRes)
    )
)]
async fn get_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<pb::MedicalRecord>> {
    let record = state.clinic_service.get_medical_record(path_id(&id)?)?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    put,
    path = "/medical-records/{id}",
    params(("id" = u64, Path, description = "Medical record identifier")),
    request_body = pb::UpdateMedicalRecordReq,
    responses(
        (status = 200, description = "Updated medical record", body = pb::MedicalRecord),
        (status = 400, description = "Invalid identifier or blank field", body = ErrorRes),
        (status = 404, description = "No such medical record or patient", body = ErrorRes)
    )
)]
async fn update_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<pb::UpdateMedicalRecordReq>,
) -> ApiResult<Json<pb::MedicalRecord>> {
    let record = state.clinic_service.update_medical_record(
        path_id(&id)?,
        req.patient_id,
        req.lab_results,
        req.treatment_history,
    )?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/medical-records/{id}",
    params(("id" = u64, Path, description = "Medical record identifier")),
    responses(
        (status = 204, description = "Medical record deleted"),
        (status = 404, description = "No such medical record", body = ErrorRes)
    )
)]
async fn delete_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.clinic_service.delete_medical_record(path_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/medical-records",
    responses(
        (status = 200, description = "All medical records", body = pb::ListMedicalRecordsRes)
    )
)]
async fn list_medical_records(State(state): State<AppState>) -> Json<pb::ListMedicalRecordsRes> {
    let medical_records = state
        .clinic_service
        .list_medical_records()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(pb::ListMedicalRecordsRes { medical_records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn app() -> Router {
        router(ClinicService::default())
    }

    fn alice() -> Value {
        json!({"name": "Alice", "contact_details": "555-0100", "medical_history": "none"})
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_patient_lifecycle() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/patients", Some(alice())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/patients/1",
            Some(json!({"name": "Alice B.", "contact_details": "555-0200", "medical_history": "asthma"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["medical_history"], "asthma");

        let (status, _) = send(&app, Method::DELETE, "/patients/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, "/patients/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "NotFound");
        assert_eq!(body["msg"], "patient with id=1 not found");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let (status, body) = send(&app(), Method::GET, "/messages/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_blank_name_is_bad_request() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/patients",
            Some(json!({"name": "  ", "contact_details": "x", "medical_history": "y"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "name cannot be empty");

        let (_, body) = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(body["patients"], json!([]));
    }

    #[tokio::test]
    async fn test_appointment_requires_patient() {
        let app = app();
        let appointment = json!({
            "patient_id": 1,
            "doctor_id": 99,
            "date_time": 1_700_000_000u64,
            "reason": "checkup"
        });

        let (status, _) = send(&app, Method::POST, "/appointments", Some(appointment.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(&app, Method::POST, "/patients", Some(alice())).await;
        let (status, body) = send(&app, Method::POST, "/appointments", Some(appointment)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["patient_id"], 1);

        let (_, body) = send(&app, Method::GET, "/appointments", None).await;
        assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reminder_uses_path_patient() {
        let app = app();
        send(&app, Method::POST, "/patients", Some(alice())).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/patients/1/reminders",
            Some(json!({"content": "Bring your inhaler"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["receiver_id"], 1);
        assert_eq!(body["sender_id"], 0);
    }

    #[tokio::test]
    async fn test_negative_body_id_is_bad_request() {
        let app = app();
        send(&app, Method::POST, "/patients", Some(alice())).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/appointments",
            Some(json!({"patient_id": -1, "doctor_id": 99, "date_time": 1, "reason": "checkup"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "InvalidInput");

        let (_, body) = send(&app, Method::GET, "/appointments", None).await;
        assert_eq!(body["appointments"], json!([]));
    }

    #[tokio::test]
    async fn test_oversized_body_id_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/medical-records")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"patient_id": 18446744073709551616, "lab_results": "a", "treatment_history": "b"}"#,
            ))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = app();
        send(&app, Method::POST, "/patients", Some(alice())).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/appointments",
            Some(json!({"patient_id": 1, "doctor_id": 99, "date_time": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "InvalidInput");
        assert!(body["msg"].as_str().unwrap().contains("reason"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/patients")
            .body(Body::from(alice().to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_appointment_update_and_delete() {
        let app = app();
        send(&app, Method::POST, "/patients", Some(alice())).await;
        let bob = json!({"name": "Bob", "contact_details": "555-0111", "medical_history": "flu"});
        send(&app, Method::POST, "/patients", Some(bob)).await;
        send(
            &app,
            Method::POST,
            "/appointments",
            Some(json!({"patient_id": 1, "doctor_id": 99, "date_time": 1, "reason": "checkup"})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/appointments/1",
            Some(json!({
                "patient_id": 2,
                "doctor_id": 98,
                "date_time": 2,
                "reason": " follow-up ",
                "multimedia_content": {"image_url": "https://img.example/scan.png"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient_id"], 2);
        assert_eq!(body["reason"], "follow-up");
        assert_eq!(
            body["multimedia_content"]["image_url"],
            "https://img.example/scan.png"
        );

        let (status, body) = send(
            &app,
            Method::PUT,
            "/appointments/1",
            Some(json!({"patient_id": 7, "doctor_id": 98, "date_time": 2, "reason": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "patient with id=7 not found");

        let (status, _) = send(&app, Method::DELETE, "/appointments/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/appointments/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_message_lifecycle() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/messages",
            Some(json!({"sender_id": 5, "receiver_id": 6, "content": "Lab results are in"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = send(&app, Method::GET, "/messages/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Lab results are in");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/messages/1",
            Some(json!({"sender_id": 5, "receiver_id": 7, "content": "Results moved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["receiver_id"], 7);

        let (_, body) = send(&app, Method::GET, "/messages", None).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, "/messages/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, "/messages/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "message with id=1 not found");
    }

    #[tokio::test]
    async fn test_medical_record_crud() {
        let app = app();
        send(&app, Method::POST, "/patients", Some(alice())).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/medical-records",
            Some(json!({"patient_id": 1, "lab_results": "Hb 13.5", "treatment_history": "none"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_u64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/medical-records/{id}"),
            Some(json!({"patient_id": 1, "lab_results": "Hb 14.0", "treatment_history": "iron"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lab_results"], "Hb 14.0");

        let (status, _) = send(&app, Method::DELETE, &format!("/medical-records/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &format!("/medical-records/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
