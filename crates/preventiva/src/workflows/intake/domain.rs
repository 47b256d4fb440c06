use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::workflows::prevention::domain::{
    BiologicalSex, ConditionProfile, FreeTextTopic, RiskFactor, TernaryAnswer,
};

/// National identity document number (DNI), the patient-record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NationalId(String);

impl NationalId {
    /// Accepts the common written forms ("12.345.678", "12345678") and keeps
    /// the digits. Anything that is not 7 or 8 digits is rejected.
    pub fn parse(raw: &str) -> Result<Self, RegistrationError> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | ' '))
            .collect();
        if digits.is_empty()
            || !digits.chars().all(|c| c.is_ascii_digit())
            || !(7..=8).contains(&digits.len())
        {
            return Err(RegistrationError::InvalidNationalId {
                value: raw.to_string(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw registration form contents, validated into a [`PatientRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSubmission {
    pub national_id: String,
    pub given_name: String,
    pub family_name: String,
    pub birth_date: NaiveDate,
    pub biological_sex: BiologicalSex,
    #[serde(default)]
    pub self_perceived_gender: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Input-validation failures. Reported to the caller, no state is mutated.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("national id '{value}' is not a valid DNI (expected 7 or 8 digits)")]
    InvalidNationalId { value: String },
    #[error("given and family names are required")]
    MissingName,
    #[error("email address '{value}' is invalid")]
    InvalidEmail { value: String },
    #[error("birth date {value} is in the future")]
    BirthDateInFuture { value: NaiveDate },
}

/// Validated, normalized patient record as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub national_id: NationalId,
    pub given_name: String,
    pub family_name: String,
    pub birth_date: NaiveDate,
    pub biological_sex: BiologicalSex,
    pub self_perceived_gender: Option<String>,
    pub email: String,
    pub phone: String,
}

impl PatientRecord {
    /// Validate an inbound registration. Names are trimmed and title-cased
    /// and the email lowercased, matching what the intake form always did.
    pub fn from_submission(
        submission: RegistrationSubmission,
        today: NaiveDate,
    ) -> Result<Self, RegistrationError> {
        let national_id = NationalId::parse(&submission.national_id)?;

        let given_name = title_case(&submission.given_name);
        let family_name = title_case(&submission.family_name);
        if given_name.is_empty() || family_name.is_empty() {
            return Err(RegistrationError::MissingName);
        }

        let email = submission.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(RegistrationError::InvalidEmail {
                value: submission.email,
            });
        }

        if submission.birth_date > today {
            return Err(RegistrationError::BirthDateInFuture {
                value: submission.birth_date,
            });
        }

        Ok(Self {
            national_id,
            given_name,
            family_name,
            birth_date: submission.birth_date,
            biological_sex: submission.biological_sex,
            self_perceived_gender: submission.self_perceived_gender,
            email,
            phone: submission.phone.trim().to_string(),
        })
    }

    /// Calendar-year age, matching the original intake arithmetic.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        (date.year() - self.birth_date.year()).max(0) as u32
    }
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Answers from the risk-factor step. The wizard has already enforced the
/// numeric ranges (weight 30-300 kg, height 100-250 cm); a zero height is
/// still handled defensively by the BMI classifier downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskQuestionnaire {
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub answers: BTreeMap<RiskFactor, TernaryAnswer>,
    #[serde(default)]
    pub other_cancer: Option<String>,
    #[serde(default)]
    pub other_condition: Option<String>,
}

impl RiskQuestionnaire {
    /// Combine the questionnaire with the registered demographics into the
    /// normalized condition profile the recommendation engine consumes.
    pub fn into_profile(self, record: &PatientRecord, today: NaiveDate) -> ConditionProfile {
        let mut free_text = BTreeMap::new();
        if let Some(text) = self.other_cancer {
            free_text.insert(FreeTextTopic::OtherCancer, text);
        }
        if let Some(text) = self.other_condition {
            free_text.insert(FreeTextTopic::OtherCondition, text);
        }

        ConditionProfile::new(
            record.age_on(today),
            record.biological_sex,
            record.self_perceived_gender.clone(),
            self.weight_kg,
            self.height_cm,
            self.answers,
            free_text,
        )
    }
}
