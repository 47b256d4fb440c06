use serde::{Deserialize, Serialize};

/// Steps of the intake flow, in the order a patient walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    Intro,
    Registration,
    RiskQuestionnaire,
    PatientRecommendations,
    CareTeamRecommendations,
    ProfessionalLookup,
    PersonalLookup,
}

impl IntakeStage {
    /// On-screen step title.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intro => "Inicio",
            Self::Registration => "Registro del paciente",
            Self::RiskQuestionnaire => "Cuestionario de factores de riesgo",
            Self::PatientRecommendations => "Recomendaciones para el paciente",
            Self::CareTeamRecommendations => "Recomendaciones para el equipo de salud",
            Self::ProfessionalLookup => "Consulta profesional",
            Self::PersonalLookup => "Consulta personal",
        }
    }

    /// Stages reachable from this one. The flow is deliberately linear with
    /// explicit back edges, so a session can never jump over a step.
    pub fn transitions(&self) -> &'static [IntakeStage] {
        match self {
            Self::Intro => &[
                Self::Registration,
                Self::ProfessionalLookup,
                Self::PersonalLookup,
            ],
            Self::Registration => &[Self::Intro, Self::RiskQuestionnaire],
            Self::RiskQuestionnaire => &[Self::Registration, Self::PatientRecommendations],
            Self::PatientRecommendations => &[
                Self::RiskQuestionnaire,
                Self::CareTeamRecommendations,
                Self::Intro,
            ],
            Self::CareTeamRecommendations => &[Self::PatientRecommendations],
            Self::ProfessionalLookup => &[Self::Intro],
            Self::PersonalLookup => &[Self::Intro],
        }
    }

    pub fn can_reach(&self, target: IntakeStage) -> bool {
        self.transitions().contains(&target)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("cannot move from '{from:?}' to '{to:?}'")]
    InvalidTransition { from: IntakeStage, to: IntakeStage },
}

/// A single patient's walk through the flow. Starts at the intro screen and
/// only moves along declared edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSession {
    stage: IntakeStage,
}

impl IntakeSession {
    pub fn new() -> Self {
        Self {
            stage: IntakeStage::Intro,
        }
    }

    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    pub fn advance_to(&mut self, target: IntakeStage) -> Result<(), WizardError> {
        if !self.stage.can_reach(target) {
            return Err(WizardError::InvalidTransition {
                from: self.stage,
                to: target,
            });
        }
        self.stage = target;
        Ok(())
    }

    /// Back to the intro screen, dropping step state. Always allowed.
    pub fn reset(&mut self) {
        self.stage = IntakeStage::Intro;
    }
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}
