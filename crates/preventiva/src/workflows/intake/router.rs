use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NationalId, RegistrationSubmission};
use super::repository::{DocumentGateway, PatientRepository};
use super::service::{IntakeService, IntakeServiceError};

/// Router builder exposing HTTP endpoints for patient registration and lookup.
pub fn intake_router<R, D>(service: Arc<IntakeService<R, D>>) -> Router
where
    R: PatientRepository + 'static,
    D: DocumentGateway + 'static,
{
    Router::new()
        .route("/api/v1/pacientes", post(register_handler::<R, D>))
        .route("/api/v1/pacientes/:dni", get(lookup_handler::<R, D>))
        .route(
            "/api/v1/pacientes/:dni/contacto",
            put(contact_handler::<R, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactUpdate {
    email: String,
    #[serde(default)]
    phone: String,
}

pub(crate) async fn register_handler<R, D>(
    State(service): State<Arc<IntakeService<R, D>>>,
    axum::Json(submission): axum::Json<RegistrationSubmission>,
) -> Response
where
    R: PatientRepository + 'static,
    D: DocumentGateway + 'static,
{
    let today = chrono::Utc::now().date_naive();
    match service.register(submission, today) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn lookup_handler<R, D>(
    State(service): State<Arc<IntakeService<R, D>>>,
    Path(dni): Path<String>,
) -> Response
where
    R: PatientRepository + 'static,
    D: DocumentGateway + 'static,
{
    let national_id = match NationalId::parse(&dni) {
        Ok(id) => id,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.lookup(&national_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn contact_handler<R, D>(
    State(service): State<Arc<IntakeService<R, D>>>,
    Path(dni): Path<String>,
    axum::Json(update): axum::Json<ContactUpdate>,
) -> Response
where
    R: PatientRepository + 'static,
    D: DocumentGateway + 'static,
{
    let national_id = match NationalId::parse(&dni) {
        Ok(id) => id,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.update_contact(&national_id, &update.email, &update.phone) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: IntakeServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    let status = match &error {
        IntakeServiceError::Registration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeServiceError::Duplicate { .. } => StatusCode::CONFLICT,
        IntakeServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        IntakeServiceError::Repository(_) | IntakeServiceError::Document(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(payload)).into_response()
}
