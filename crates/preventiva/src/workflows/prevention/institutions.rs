//! Lookup of facilities offering a given study type, backed by a second
//! externally maintained sheet. Absence of a study is an empty answer, not an
//! error.

use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read institution directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid institution data: {0}")]
    Csv(#[from] csv::Error),
    #[error("institution directory unavailable: {0}")]
    Unavailable(String),
}

/// Study-type name to ordered facility names.
pub trait InstitutionDirectory: Send + Sync {
    fn facilities_for(&self, study: &str) -> Result<Vec<String>, DirectoryError>;
}

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    #[serde(rename = "Estudio")]
    study: String,
    #[serde(rename = "Institución")]
    facility: String,
}

pub fn read_facilities<R: Read>(reader: R, study: &str) -> Result<Vec<String>, DirectoryError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let wanted = study.trim();
    let mut facilities = Vec::new();

    for (index, record) in csv_reader.deserialize::<DirectoryRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(error) => {
                warn!(row = index + 1, %error, "skipping malformed institution row");
                continue;
            }
        };
        if row.study.eq_ignore_ascii_case(wanted) && !row.facility.is_empty() {
            facilities.push(row.facility);
        }
    }

    Ok(facilities)
}

/// Directory backed by a CSV export on disk, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct CsvInstitutionDirectory {
    path: PathBuf,
}

impl CsvInstitutionDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InstitutionDirectory for CsvInstitutionDirectory {
    fn facilities_for(&self, study: &str) -> Result<Vec<String>, DirectoryError> {
        let file = std::fs::File::open(&self.path)?;
        read_facilities(file, study)
    }
}

/// Stand-in for deployments without a configured directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

impl InstitutionDirectory for EmptyDirectory {
    fn facilities_for(&self, _study: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(Vec::new())
    }
}
