use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sex assigned at birth, as captured on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    pub const fn label(self) -> &'static str {
        match self {
            BiologicalSex::Male => "Masculino",
            BiologicalSex::Female => "Femenino",
        }
    }
}

/// Three-valued answer to a risk-factor question. The questionnaire shows the
/// labels below verbatim, and criterion expressions compare against them as
/// opaque strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TernaryAnswer {
    Yes,
    #[default]
    No,
    Unknown,
}

impl TernaryAnswer {
    pub const fn label(self) -> &'static str {
        match self {
            TernaryAnswer::Yes => "Sí",
            TernaryAnswer::No => "No",
            TernaryAnswer::Unknown => "No lo sé",
        }
    }

    /// `Unknown` never triggers a recommendation.
    pub const fn is_yes(self) -> bool {
        matches!(self, TernaryAnswer::Yes)
    }
}

/// Self-reported risk factors collected by the questionnaire step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Hypertension,
    Diabetes,
    Cholesterol,
    Sedentary,
    ProlongedSitting,
    Smoker,
    SmokerTwentyYears,
    SubstanceAbuse,
    FamilyViolence,
    Depression,
    FamilyHistoryColon,
    FamilyHistoryBreast,
    FamilyHistoryCervical,
    PregnancyPlanned,
}

/// Free-text questionnaire fields that have no fixed answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeTextTopic {
    OtherCancer,
    OtherCondition,
}

/// Normalized snapshot of one patient's demographics and risk-factor answers.
///
/// Built once per wizard session after the questionnaire step is submitted and
/// treated as immutable afterwards; resubmitting the step re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionProfile {
    pub age: u32,
    pub biological_sex: BiologicalSex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_perceived_gender: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub risk_factors: BTreeMap<RiskFactor, TernaryAnswer>,
    #[serde(default)]
    pub free_text: BTreeMap<FreeTextTopic, String>,
}

impl ConditionProfile {
    pub fn new(
        age: u32,
        biological_sex: BiologicalSex,
        self_perceived_gender: Option<String>,
        weight_kg: f64,
        height_cm: f64,
        risk_factors: BTreeMap<RiskFactor, TernaryAnswer>,
        free_text: BTreeMap<FreeTextTopic, String>,
    ) -> Self {
        let profile = Self {
            age,
            biological_sex,
            self_perceived_gender,
            weight_kg,
            height_cm,
            risk_factors,
            free_text,
        };
        profile.normalized()
    }

    /// Apply the profile invariants: `SmokerTwentyYears` is meaningful only for
    /// smokers, `PregnancyPlanned` only for female patients, and blank free-text
    /// entries carry no information.
    pub fn normalized(mut self) -> Self {
        if !self.answer(RiskFactor::Smoker).is_yes() {
            self.risk_factors
                .insert(RiskFactor::SmokerTwentyYears, TernaryAnswer::No);
        }
        if self.biological_sex != BiologicalSex::Female {
            self.risk_factors
                .insert(RiskFactor::PregnancyPlanned, TernaryAnswer::No);
        }
        self.free_text.retain(|_, text| !text.trim().is_empty());
        self
    }

    /// Answer for a factor; absent keys read as `No`.
    pub fn answer(&self, factor: RiskFactor) -> TernaryAnswer {
        self.risk_factors.get(&factor).copied().unwrap_or_default()
    }

    pub fn has(&self, factor: RiskFactor) -> bool {
        self.answer(factor).is_yes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with(
        sex: BiologicalSex,
        answers: &[(RiskFactor, TernaryAnswer)],
    ) -> ConditionProfile {
        ConditionProfile::new(
            40,
            sex,
            None,
            70.0,
            170.0,
            answers.iter().copied().collect(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn chronic_smoking_is_cleared_for_non_smokers() {
        let profile = profile_with(
            BiologicalSex::Male,
            &[
                (RiskFactor::Smoker, TernaryAnswer::No),
                (RiskFactor::SmokerTwentyYears, TernaryAnswer::Yes),
            ],
        );
        assert!(!profile.has(RiskFactor::SmokerTwentyYears));
    }

    #[test]
    fn pregnancy_planning_is_cleared_for_male_patients() {
        let profile = profile_with(
            BiologicalSex::Male,
            &[(RiskFactor::PregnancyPlanned, TernaryAnswer::Yes)],
        );
        assert!(!profile.has(RiskFactor::PregnancyPlanned));

        let profile = profile_with(
            BiologicalSex::Female,
            &[(RiskFactor::PregnancyPlanned, TernaryAnswer::Yes)],
        );
        assert!(profile.has(RiskFactor::PregnancyPlanned));
    }

    #[test]
    fn absent_factors_read_as_no() {
        let profile = profile_with(BiologicalSex::Female, &[]);
        assert_eq!(profile.answer(RiskFactor::Diabetes), TernaryAnswer::No);
        assert!(!profile.has(RiskFactor::Diabetes));
    }

    #[test]
    fn unknown_answers_do_not_count_as_yes() {
        let profile = profile_with(
            BiologicalSex::Female,
            &[(RiskFactor::Hypertension, TernaryAnswer::Unknown)],
        );
        assert!(!profile.has(RiskFactor::Hypertension));
        assert_eq!(
            profile.answer(RiskFactor::Hypertension).label(),
            "No lo sé"
        );
    }
}
