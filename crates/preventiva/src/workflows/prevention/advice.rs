//! Fixed, code-defined screening rules. These are the baseline guidance that
//! stays available even when the external catalog is unreachable, one set
//! worded for the patient and one for the care team.

use serde::{Deserialize, Serialize};

use super::bmi::SeverityBand;
use super::domain::{BiologicalSex, ConditionProfile, RiskFactor};

/// Patient-facing advisory with the display tier of its triggering condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub topic: String,
    pub detail: String,
    pub severity: SeverityBand,
}

/// Clinical action suggested to the care team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalAction {
    pub topic: String,
    pub detail: String,
}

fn advisory(topic: &str, detail: String, severity: SeverityBand) -> AdvisoryMessage {
    AdvisoryMessage {
        topic: topic.to_string(),
        detail,
        severity,
    }
}

/// Personalized guidance for the patient, in the fixed emission order:
/// weight first, then each self-reported condition.
pub fn patient_recommendations(
    name: &str,
    profile: &ConditionProfile,
    bmi_value: f64,
) -> Vec<AdvisoryMessage> {
    let mut messages = Vec::new();

    if bmi_value >= 30.0 {
        messages.push(advisory(
            "Control de peso",
            format!("{name}, tu IMC indica que podrías beneficiarte con un plan de manejo de peso"),
            SeverityBand::Danger,
        ));
    } else if bmi_value >= 25.0 {
        messages.push(advisory(
            "Peso saludable",
            format!("{name}, te recomendamos mantener un balance nutricional"),
            SeverityBand::Warning,
        ));
    }

    if profile.has(RiskFactor::Hypertension) {
        messages.push(advisory(
            "Presión arterial",
            "Control médico regular y reducción de sodio en la dieta".to_string(),
            SeverityBand::Info,
        ));
    }
    if profile.has(RiskFactor::Diabetes) {
        messages.push(advisory(
            "Glucosa en sangre",
            "Monitoreo periódico y plan alimentario personalizado".to_string(),
            SeverityBand::Info,
        ));
    }
    if profile.has(RiskFactor::Cholesterol) {
        messages.push(advisory(
            "Colesterol",
            "Perfil lipídico anual y reducción de grasas saturadas".to_string(),
            SeverityBand::Info,
        ));
    }
    if profile.has(RiskFactor::Sedentary) {
        messages.push(advisory(
            "Actividad física",
            "Iniciar con 30 minutos diarios de caminata".to_string(),
            SeverityBand::Info,
        ));
    }
    if profile.has(RiskFactor::ProlongedSitting) {
        messages.push(advisory(
            "Postura y movimiento",
            "Pausas activas cada 45 minutos".to_string(),
            SeverityBand::Info,
        ));
    }
    if profile.has(RiskFactor::Smoker) {
        messages.push(advisory(
            "Dejar de fumar",
            "Te recomendamos buscar ayuda profesional para dejar el tabaco".to_string(),
            SeverityBand::Warning,
        ));
        if profile.has(RiskFactor::SmokerTwentyYears) {
            messages.push(advisory(
                "Fumador crónico",
                "Es importante realizar estudios de detección temprana de enfermedades pulmonares"
                    .to_string(),
                SeverityBand::Danger,
            ));
        }
    }
    if profile.has(RiskFactor::PregnancyPlanned) {
        messages.push(advisory(
            "Ácido fólico",
            "Si planeas embarazo, comienza con suplementos de ácido fólico".to_string(),
            SeverityBand::Info,
        ));
    }

    messages
}

fn action(topic: &str, detail: &str) -> ClinicalAction {
    ClinicalAction {
        topic: topic.to_string(),
        detail: detail.to_string(),
    }
}

/// Age/sex-gated clinical actions for the care team. Gates are evaluated
/// independently, so several can fire for the same profile; emission order
/// follows the screening protocol (breast, colorectal, cervical,
/// cardiovascular).
pub fn care_team_recommendations(profile: &ConditionProfile) -> Vec<ClinicalAction> {
    let mut actions = Vec::new();
    let female = profile.biological_sex == BiologicalSex::Female;

    if female && profile.age >= 50 {
        actions.push(action(
            "Prevención de cáncer de mama",
            "Solicitar mamografía bilateral",
        ));
        if profile.has(RiskFactor::FamilyHistoryBreast) {
            actions.push(action(
                "Prevención de cáncer de mama (antecedentes)",
                "Indicar ecografía mamaria + mamografía bilateral a partir de los 40 años",
            ));
        }
    }

    if profile.age >= 50 {
        actions.push(action(
            "Prevención de cáncer colorrectal",
            "Indicar sangre oculta en materia fecal y/o videocolonoscopia",
        ));
    }

    if female && profile.age >= 18 {
        actions.push(action(
            "Prevención de cáncer de cuello uterino",
            "Indicar test de HPV",
        ));
    }

    if profile.age >= 18 {
        actions.push(action(
            "Prevención cardiovascular",
            "Tomar presión arterial en ambos brazos, medir peso y altura, indicar colesterol total y HDL",
        ));
    }

    actions
}
