use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::advice::{self, AdvisoryMessage, ClinicalAction};
use super::bmi::{self, BmiResult};
use super::catalog::CatalogSource;
use super::domain::ConditionProfile;
use super::engine::{self, RecommendationSet};
use super::institutions::InstitutionDirectory;

/// Shared handles to the external tabular stores.
#[derive(Clone)]
pub struct PreventionState {
    pub catalog: Arc<dyn CatalogSource>,
    pub institutions: Arc<dyn InstitutionDirectory>,
}

/// Router builder exposing the recommendation and institution-lookup endpoints.
pub fn prevention_router(state: PreventionState) -> Router {
    Router::new()
        .route("/api/v1/recomendaciones", post(recommend_handler))
        .route("/api/v1/instituciones/:estudio", get(institutions_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// First name used in the patient-facing wording.
    pub name: String,
    pub profile: ConditionProfile,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub bmi: BmiResult,
    pub bmi_label: &'static str,
    pub patient_advice: Vec<AdvisoryMessage>,
    pub care_team_actions: Vec<ClinicalAction>,
    pub interventions: RecommendationSet,
    pub catalog_available: bool,
}

pub(crate) async fn recommend_handler(
    State(state): State<PreventionState>,
    Json(request): Json<RecommendationRequest>,
) -> Response {
    let RecommendationRequest { name, profile } = request;
    let profile = profile.normalized();
    let bmi = bmi::classify(profile.weight_kg, profile.height_cm);
    let outcome = engine::recommend(&profile, &bmi, state.catalog.as_ref());

    let response = RecommendationResponse {
        bmi,
        bmi_label: bmi.category.label(),
        patient_advice: advice::patient_recommendations(&name, &profile, bmi.value),
        care_team_actions: advice::care_team_recommendations(&profile),
        interventions: outcome.set,
        catalog_available: outcome.catalog_available,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Debug, Serialize)]
pub struct InstitutionResponse {
    pub study: String,
    pub facilities: Vec<String>,
    pub directory_available: bool,
}

pub(crate) async fn institutions_handler(
    State(state): State<PreventionState>,
    Path(study): Path<String>,
) -> Response {
    let (facilities, directory_available) = match state.institutions.facilities_for(&study) {
        Ok(facilities) => (facilities, true),
        Err(error) => {
            warn!(%study, %error, "institution directory unreachable");
            (Vec::new(), false)
        }
    };

    let response = InstitutionResponse {
        study,
        facilities,
        directory_available,
    };
    (StatusCode::OK, Json(response)).into_response()
}
