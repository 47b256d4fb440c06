use serde::{Deserialize, Serialize};

/// Display tier attached to a message or BMI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
    Error,
}

impl BmiCategory {
    pub const fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Bajo peso",
            BmiCategory::Normal => "Peso normal",
            BmiCategory::Overweight => "Sobrepeso",
            BmiCategory::ObesityI => "Obesidad Grado I",
            BmiCategory::ObesityII => "Obesidad Grado II",
            BmiCategory::ObesityIII => "Obesidad Grado III",
            BmiCategory::Error => "Error",
        }
    }

    pub const fn severity_band(self) -> SeverityBand {
        match self {
            BmiCategory::Overweight => SeverityBand::Warning,
            BmiCategory::ObesityI | BmiCategory::ObesityII | BmiCategory::ObesityIII => {
                SeverityBand::Danger
            }
            _ => SeverityBand::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    pub severity_band: SeverityBand,
}

// Upper-exclusive thresholds evaluated in ascending order; a value exactly on a
// boundary lands in the higher category.
const THRESHOLDS: [(f64, BmiCategory); 5] = [
    (18.5, BmiCategory::Underweight),
    (25.0, BmiCategory::Normal),
    (30.0, BmiCategory::Overweight),
    (35.0, BmiCategory::ObesityI),
    (40.0, BmiCategory::ObesityII),
];

/// Classify a weight/height pair. Never panics: a zero, negative, or
/// non-finite height yields the `Error` category instead of dividing by zero.
pub fn classify(weight_kg: f64, height_cm: f64) -> BmiResult {
    if height_cm <= 0.0 || !height_cm.is_finite() || !weight_kg.is_finite() {
        return BmiResult {
            value: 0.0,
            category: BmiCategory::Error,
            severity_band: BmiCategory::Error.severity_band(),
        };
    }

    let meters = height_cm / 100.0;
    let value = weight_kg / (meters * meters);
    let category = THRESHOLDS
        .iter()
        .find(|(limit, _)| value < *limit)
        .map(|(_, category)| *category)
        .unwrap_or(BmiCategory::ObesityIII);

    BmiResult {
        value,
        category,
        severity_band: category.severity_band(),
    }
}
