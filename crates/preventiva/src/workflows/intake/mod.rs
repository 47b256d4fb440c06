//! Patient intake: registration, the step-by-step flow, and record and
//! document stores behind trait seams.

pub mod domain;
pub mod drive;
pub mod repository;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    NationalId, PatientRecord, RegistrationError, RegistrationSubmission, RiskQuestionnaire,
};
pub use drive::GoogleDriveClient;
pub use repository::{
    DocumentError, DocumentGateway, DocumentRef, PatientDocument, PatientRepository,
    RepositoryError,
};
pub use router::intake_router;
pub use service::{IntakeService, IntakeServiceError};
pub use wizard::{IntakeSession, IntakeStage, WizardError};
