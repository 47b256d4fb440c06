//! Preventive-care core: BMI classification, criterion matching against the
//! externally maintained intervention catalog, and the fixed screening rules.

pub mod advice;
pub mod bmi;
pub mod catalog;
pub mod criteria;
pub mod domain;
pub mod engine;
pub mod institutions;
pub mod router;

#[cfg(test)]
mod tests;

pub use advice::{
    care_team_recommendations, patient_recommendations, AdvisoryMessage, ClinicalAction,
};
pub use bmi::{classify, BmiCategory, BmiResult, SeverityBand};
pub use catalog::{CatalogError, CatalogSource, CsvCatalogSource, EmptyCatalog, InterventionRule};
pub use criteria::{evaluate, CriterionError, ScopeValue, VariableScope};
pub use domain::{BiologicalSex, ConditionProfile, FreeTextTopic, RiskFactor, TernaryAnswer};
pub use engine::{
    aggregate, recommend, CategoryGroup, RecommendationOutcome, RecommendationSet, SummaryRow,
};
pub use institutions::{
    CsvInstitutionDirectory, DirectoryError, EmptyDirectory, InstitutionDirectory,
};
pub use router::{prevention_router, PreventionState, RecommendationRequest};
