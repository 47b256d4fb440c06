use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use preventiva::config::SourcesConfig;
use preventiva::workflows::intake::{
    DocumentError, DocumentGateway, DocumentRef, NationalId, PatientDocument, PatientRecord,
    PatientRepository, RepositoryError,
};
use preventiva::workflows::prevention::{
    CatalogSource, CsvCatalogSource, CsvInstitutionDirectory, EmptyCatalog, EmptyDirectory,
    InstitutionDirectory,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPatientRepository {
    records: Arc<Mutex<HashMap<NationalId, PatientRecord>>>,
}

impl PatientRepository for InMemoryPatientRepository {
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

/// Document archive that keeps uploads in memory. Deployments with a
/// configured Drive folder swap in the Drive-backed gateway instead.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentArchive {
    uploads: Arc<Mutex<Vec<PatientDocument>>>,
}

impl InMemoryDocumentArchive {
    pub(crate) fn uploads(&self) -> Vec<PatientDocument> {
        self.uploads.lock().expect("archive mutex poisoned").clone()
    }
}

impl DocumentGateway for InMemoryDocumentArchive {
    fn upload(
        &self,
        _folder_id: Option<&str>,
        document: &PatientDocument,
    ) -> Result<DocumentRef, DocumentError> {
        let mut guard = self.uploads.lock().expect("archive mutex poisoned");
        guard.push(document.clone());
        Ok(DocumentRef {
            file_id: format!("mem-{:03}", guard.len()),
            web_view_link: None,
        })
    }
}

pub(crate) fn catalog_source(sources: &SourcesConfig) -> Arc<dyn CatalogSource> {
    match &sources.interventions_csv {
        Some(path) => Arc::new(CsvCatalogSource::new(path.clone())),
        None => Arc::new(EmptyCatalog),
    }
}

pub(crate) fn institution_directory(sources: &SourcesConfig) -> Arc<dyn InstitutionDirectory> {
    match &sources.institutions_csv {
        Some(path) => Arc::new(CsvInstitutionDirectory::new(path.clone())),
        None => Arc::new(EmptyDirectory),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
