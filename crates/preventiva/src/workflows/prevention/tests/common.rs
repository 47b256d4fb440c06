use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::prevention::bmi::{classify, BmiResult};
use crate::workflows::prevention::catalog::{CatalogError, CatalogSource, InterventionRule};
use crate::workflows::prevention::domain::{
    BiologicalSex, ConditionProfile, RiskFactor, TernaryAnswer,
};
use crate::workflows::prevention::institutions::{DirectoryError, InstitutionDirectory};
use crate::workflows::prevention::router::{prevention_router, PreventionState};

pub(super) fn profile(
    age: u32,
    sex: BiologicalSex,
    answers: &[(RiskFactor, TernaryAnswer)],
) -> ConditionProfile {
    ConditionProfile::new(
        age,
        sex,
        None,
        70.0,
        170.0,
        answers.iter().copied().collect(),
        BTreeMap::new(),
    )
}

pub(super) fn profile_with_bmi(
    age: u32,
    sex: BiologicalSex,
    bmi_target: f64,
    answers: &[(RiskFactor, TernaryAnswer)],
) -> (ConditionProfile, BmiResult) {
    // Height of two meters makes the index weight / 4.
    let weight = bmi_target * 4.0;
    let profile = ConditionProfile::new(
        age,
        sex,
        None,
        weight,
        200.0,
        answers.iter().copied().collect(),
        BTreeMap::new(),
    );
    let bmi = classify(profile.weight_kg, profile.height_cm);
    (profile, bmi)
}

pub(super) fn rule(name: &str, category: &str, criterion: &str) -> InterventionRule {
    InterventionRule {
        name: name.to_string(),
        category: category.to_string(),
        explanation: format!("Explicación de {name}"),
        criterion: criterion.to_string(),
    }
}

/// Catalog source that serves a fixed rule list.
pub(super) struct FixedCatalog(pub(super) Vec<InterventionRule>);

impl CatalogSource for FixedCatalog {
    fn fetch(&self) -> Result<Vec<InterventionRule>, CatalogError> {
        Ok(self.0.clone())
    }
}

/// Catalog source that always fails, for degraded-mode scenarios.
pub(super) struct UnreachableCatalog;

impl CatalogSource for UnreachableCatalog {
    fn fetch(&self) -> Result<Vec<InterventionRule>, CatalogError> {
        Err(CatalogError::Unavailable("connection timed out".to_string()))
    }
}

/// Directory that serves a fixed facility list for every study.
pub(super) struct FixedDirectory(pub(super) Vec<String>);

impl InstitutionDirectory for FixedDirectory {
    fn facilities_for(&self, _study: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(self.0.clone())
    }
}

/// Directory that always fails, for degraded-mode scenarios.
pub(super) struct UnreachableDirectory;

impl InstitutionDirectory for UnreachableDirectory {
    fn facilities_for(&self, _study: &str) -> Result<Vec<String>, DirectoryError> {
        Err(DirectoryError::Unavailable("sheet offline".to_string()))
    }
}

pub(super) fn router_with_sources(
    catalog: impl CatalogSource + 'static,
    institutions: impl InstitutionDirectory + 'static,
) -> axum::Router {
    prevention_router(PreventionState {
        catalog: Arc::new(catalog),
        institutions: Arc::new(institutions),
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16384)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
