//! Access to the externally maintained intervention catalog.
//!
//! The catalog lives in a spreadsheet owned by the clinical team; the service
//! consumes CSV exports of it. Every fetch is a full reload. Malformed rows are
//! skipped with a warning and an unreachable source degrades to an empty
//! catalog, so the static screening rules keep working without it.

use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One intervention row: the criterion decides applicability, the rest is
/// display material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionRule {
    pub name: String,
    pub category: String,
    pub explanation: String,
    pub criterion: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read intervention catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Full-reload access to the catalog. Implementations must not cache across
/// fetches; the catalog is small and edited out-of-band.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<InterventionRule>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Nombre")]
    name: String,
    #[serde(rename = "Categoría")]
    category: String,
    #[serde(rename = "Criterio")]
    criterion: String,
    #[serde(rename = "Explicación", default)]
    explanation: String,
}

/// Parse a catalog CSV export, preserving row order. Rows that fail to
/// deserialize or lack a name, category, or criterion are skipped with a
/// warning; they never abort the load.
pub fn read_rules<R: Read>(reader: R) -> Result<Vec<InterventionRule>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(error) => {
                warn!(row = index + 1, %error, "skipping malformed catalog row");
                continue;
            }
        };
        if row.name.is_empty() || row.category.is_empty() || row.criterion.is_empty() {
            warn!(row = index + 1, "skipping catalog row with missing required fields");
            continue;
        }
        rules.push(InterventionRule {
            name: row.name,
            category: row.category,
            explanation: row.explanation,
            criterion: row.criterion,
        });
    }

    Ok(rules)
}

/// Catalog backed by a CSV export on disk, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for CsvCatalogSource {
    fn fetch(&self) -> Result<Vec<InterventionRule>, CatalogError> {
        let file = std::fs::File::open(&self.path)?;
        read_rules(file)
    }
}

/// Stand-in for deployments without a configured catalog: always empty,
/// never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl CatalogSource for EmptyCatalog {
    fn fetch(&self) -> Result<Vec<InterventionRule>, CatalogError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Nombre,Categoría,Criterio,Explicación\n";

    #[test]
    fn reads_rows_in_catalog_order() {
        let csv = format!(
            "{HEADER}\
             Mamografía,Cáncer,\"sexo == 'Femenino' and edad >= 50\",Tamizaje bienal\n\
             Presión arterial,Cardiovascular,edad >= 18,Control anual\n"
        );
        let rules = read_rules(Cursor::new(csv)).expect("catalog parses");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "Mamografía");
        assert_eq!(rules[1].category, "Cardiovascular");
    }

    #[test]
    fn skips_rows_with_missing_required_fields() {
        let csv = format!(
            "{HEADER}\
             ,Cáncer,edad >= 50,Sin nombre\n\
             Test de HPV,Cáncer,sexo == 'Femenino' and edad >= 18,Trienal\n\
             Colonoscopia,,edad >= 50,Sin categoría\n"
        );
        let rules = read_rules(Cursor::new(csv)).expect("catalog parses");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Test de HPV");
    }

    #[test]
    fn skips_short_rows_without_aborting() {
        let csv = format!(
            "{HEADER}\
             Mamografía,Cáncer\n\
             Colonoscopia,Cáncer,edad >= 50,Cada diez años\n"
        );
        let rules = read_rules(Cursor::new(csv)).expect("catalog parses");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Colonoscopia");
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let source = CsvCatalogSource::new("/nonexistent/catalogo.csv");
        assert!(matches!(source.fetch(), Err(CatalogError::Io(_))));
    }
}
