use serde::{Deserialize, Serialize};

use super::domain::{NationalId, PatientRecord};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PatientRepository: Send + Sync {
    fn find(&self, national_id: &NationalId) -> Result<Option<PatientRecord>, RepositoryError>;
    fn upsert(&self, record: PatientRecord) -> Result<(), RepositoryError>;
}

/// Error enumeration for record-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// A consent form, lab result, or similar attachment to archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Handle to an archived document in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_id: String,
    pub web_view_link: Option<String>,
}

/// Outbound document archive (Drive in production, in-memory in tests).
pub trait DocumentGateway: Send + Sync {
    fn upload(
        &self,
        folder_id: Option<&str>,
        document: &PatientDocument,
    ) -> Result<DocumentRef, DocumentError>;
}

/// Document archive error.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document backend failed: {0}")]
    Backend(String),
    #[error("document backend unavailable: {0}")]
    Unavailable(String),
}
