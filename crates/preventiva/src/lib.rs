//! Preventiva builds a patient's preventive "hoja de vida": it normalizes the
//! answers collected by the intake wizard, classifies body-mass index, matches
//! the profile against an externally maintained intervention catalog, and
//! produces patient-facing and care-team-facing guidance.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
