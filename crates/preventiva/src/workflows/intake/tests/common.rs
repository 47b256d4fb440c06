use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::intake::domain::{NationalId, PatientRecord, RegistrationSubmission};
use crate::workflows::intake::repository::{
    DocumentError, DocumentGateway, DocumentRef, PatientDocument, PatientRepository,
    RepositoryError,
};
use crate::workflows::intake::{intake_router, IntakeService};
use crate::workflows::prevention::domain::BiologicalSex;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 28).expect("valid date")
}

pub(super) fn submission() -> RegistrationSubmission {
    RegistrationSubmission {
        national_id: "23456789".to_string(),
        given_name: "Carla".to_string(),
        family_name: "Domínguez".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1971, 3, 2).expect("valid date"),
        biological_sex: BiologicalSex::Female,
        self_perceived_gender: None,
        email: "carla@example.com".to_string(),
        phone: "+5491155550000".to_string(),
    }
}

pub(super) fn document() -> PatientDocument {
    PatientDocument {
        file_name: "consentimiento.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4 stub".to_vec(),
    }
}

pub(super) fn build_service() -> (
    IntakeService<MemoryRepository, MemoryDocuments>,
    Arc<MemoryRepository>,
    Arc<MemoryDocuments>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let documents = Arc::new(MemoryDocuments::default());
    let service = IntakeService::new(
        repository.clone(),
        documents.clone(),
        Some("folder-consultorio".to_string()),
    );
    (service, repository, documents)
}

pub(super) fn router_with_service(
    service: IntakeService<MemoryRepository, MemoryDocuments>,
) -> axum::Router {
    intake_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<NationalId, PatientRecord>>>,
}

impl PatientRepository for MemoryRepository {
    fn find(&self, national_id: &NationalId) -> Result<Option<PatientRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(national_id).cloned())
    }

    fn upsert(&self, record: PatientRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.national_id.clone(), record);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDocuments {
    uploads: Arc<Mutex<Vec<(Option<String>, PatientDocument)>>>,
}

impl MemoryDocuments {
    pub(super) fn uploads(&self) -> Vec<(Option<String>, PatientDocument)> {
        self.uploads.lock().expect("document mutex poisoned").clone()
    }
}

impl DocumentGateway for MemoryDocuments {
    fn upload(
        &self,
        folder_id: Option<&str>,
        document: &PatientDocument,
    ) -> Result<DocumentRef, DocumentError> {
        let mut guard = self.uploads.lock().expect("document mutex poisoned");
        guard.push((folder_id.map(str::to_string), document.clone()));
        Ok(DocumentRef {
            file_id: format!("file-{:03}", guard.len()),
            web_view_link: None,
        })
    }
}

pub(super) struct UnavailableRepository;

impl PatientRepository for UnavailableRepository {
    fn find(&self, _national_id: &NationalId) -> Result<Option<PatientRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn upsert(&self, _record: PatientRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) struct FailingDocuments;

impl DocumentGateway for FailingDocuments {
    fn upload(
        &self,
        _folder_id: Option<&str>,
        _document: &PatientDocument,
    ) -> Result<DocumentRef, DocumentError> {
        Err(DocumentError::Backend("quota exceeded".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
