use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{
    NationalId, PatientRecord, RegistrationError, RegistrationSubmission, RiskQuestionnaire,
};
use super::repository::{
    DocumentError, DocumentGateway, DocumentRef, PatientDocument, PatientRepository,
    RepositoryError,
};
use crate::workflows::prevention::domain::ConditionProfile;

/// Service composing the patient record store and the document archive.
pub struct IntakeService<R, D> {
    repository: Arc<R>,
    documents: Arc<D>,
    document_folder_id: Option<String>,
}

impl<R, D> IntakeService<R, D>
where
    R: PatientRepository + 'static,
    D: DocumentGateway + 'static,
{
    pub fn new(repository: Arc<R>, documents: Arc<D>, document_folder_id: Option<String>) -> Self {
        Self {
            repository,
            documents,
            document_folder_id,
        }
    }

    /// Register a new patient. A DNI already on file is a conflict; the
    /// existing record is never silently overwritten.
    pub fn register(
        &self,
        submission: RegistrationSubmission,
        today: NaiveDate,
    ) -> Result<PatientRecord, IntakeServiceError> {
        let record = PatientRecord::from_submission(submission, today)?;

        if self.repository.find(&record.national_id)?.is_some() {
            return Err(IntakeServiceError::Duplicate {
                national_id: record.national_id.clone(),
            });
        }

        self.repository.upsert(record.clone())?;
        tracing::info!(national_id = %record.national_id, "patient registered");
        Ok(record)
    }

    /// Fetch a registered patient for the lookup screens.
    pub fn lookup(&self, national_id: &NationalId) -> Result<PatientRecord, IntakeServiceError> {
        self.repository
            .find(national_id)?
            .ok_or_else(|| IntakeServiceError::NotFound {
                national_id: national_id.clone(),
            })
    }

    /// Update contact details on an existing record. Demographics are fixed
    /// once registered.
    pub fn update_contact(
        &self,
        national_id: &NationalId,
        email: &str,
        phone: &str,
    ) -> Result<PatientRecord, IntakeServiceError> {
        let mut record = self.lookup(national_id)?;

        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(IntakeServiceError::Registration(
                RegistrationError::InvalidEmail {
                    value: email.clone(),
                },
            ));
        }

        record.email = email;
        record.phone = phone.trim().to_string();
        self.repository.upsert(record.clone())?;
        Ok(record)
    }

    /// Resolve the questionnaire into the condition profile the
    /// recommendation engine consumes.
    pub fn profile_for(
        &self,
        national_id: &NationalId,
        questionnaire: RiskQuestionnaire,
        today: NaiveDate,
    ) -> Result<(PatientRecord, ConditionProfile), IntakeServiceError> {
        let record = self.lookup(national_id)?;
        let profile = questionnaire.into_profile(&record, today);
        Ok((record, profile))
    }

    /// Archive a document against a registered patient.
    pub fn attach_document(
        &self,
        national_id: &NationalId,
        document: &PatientDocument,
    ) -> Result<DocumentRef, IntakeServiceError> {
        // Only registered patients may carry attachments.
        let record = self.lookup(national_id)?;

        let reference = self
            .documents
            .upload(self.document_folder_id.as_deref(), document)?;
        tracing::info!(
            national_id = %record.national_id,
            file_id = %reference.file_id,
            "patient document archived"
        );
        Ok(reference)
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("patient {national_id} is already registered")]
    Duplicate { national_id: NationalId },
    #[error("patient {national_id} is not registered")]
    NotFound { national_id: NationalId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}
