use crate::infra::{catalog_source, InMemoryDocumentArchive, InMemoryPatientRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use preventiva::config::SourcesConfig;
use preventiva::error::AppError;
use preventiva::workflows::intake::{
    IntakeService, IntakeSession, IntakeStage, PatientDocument, RegistrationSubmission,
    RiskQuestionnaire,
};
use preventiva::workflows::prevention::{
    care_team_recommendations, classify, patient_recommendations, recommend, AdvisoryMessage,
    BiologicalSex, ClinicalAction, ConditionProfile, RecommendationSet, RiskFactor, TernaryAnswer,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// First name used in the patient-facing wording
    #[arg(long, default_value = "Paciente")]
    pub(crate) name: String,
    /// Age in completed years
    #[arg(long)]
    pub(crate) age: u32,
    /// Biological sex: "femenino" or "masculino"
    #[arg(long, value_parser = parse_sex)]
    pub(crate) sex: BiologicalSex,
    /// Weight in kilograms
    #[arg(long)]
    pub(crate) weight_kg: f64,
    /// Height in centimeters
    #[arg(long)]
    pub(crate) height_cm: f64,
    /// The patient smokes
    #[arg(long)]
    pub(crate) fumador: bool,
    /// The patient has diabetes
    #[arg(long)]
    pub(crate) diabetes: bool,
    /// The patient has hypertension
    #[arg(long)]
    pub(crate) hipertension: bool,
    /// First-degree family history of breast cancer
    #[arg(long)]
    pub(crate) antecedentes_mama: bool,
    /// Intervention catalog CSV (falls back to the fixed rules only)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Intervention catalog CSV to match against
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Attach this file to the demo patient's record
    #[arg(long)]
    pub(crate) attach: Option<PathBuf>,
}

fn parse_sex(raw: &str) -> Result<BiologicalSex, String> {
    match raw.trim().to_lowercase().as_str() {
        "femenino" | "f" => Ok(BiologicalSex::Female),
        "masculino" | "m" => Ok(BiologicalSex::Male),
        other => Err(format!("unknown sex '{other}' (use femenino or masculino)")),
    }
}

fn sources_with_catalog(catalog: Option<PathBuf>) -> SourcesConfig {
    SourcesConfig {
        interventions_csv: catalog,
        institutions_csv: None,
        drive_folder_id: None,
    }
}

pub(crate) fn run_recommendations(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        name,
        age,
        sex,
        weight_kg,
        height_cm,
        fumador,
        diabetes,
        hipertension,
        antecedentes_mama,
        catalog,
    } = args;

    let mut answers = BTreeMap::new();
    if fumador {
        answers.insert(RiskFactor::Smoker, TernaryAnswer::Yes);
    }
    if diabetes {
        answers.insert(RiskFactor::Diabetes, TernaryAnswer::Yes);
    }
    if hipertension {
        answers.insert(RiskFactor::Hypertension, TernaryAnswer::Yes);
    }
    if antecedentes_mama {
        answers.insert(RiskFactor::FamilyHistoryBreast, TernaryAnswer::Yes);
    }

    let profile = ConditionProfile::new(
        age,
        sex,
        None,
        weight_kg,
        height_cm,
        answers,
        BTreeMap::new(),
    );

    render_recommendations(&name, &profile, catalog);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        catalog,
        attach,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Hoja de Vida Preventiva demo");

    let repository = Arc::new(InMemoryPatientRepository::default());
    let archive = Arc::new(InMemoryDocumentArchive::default());
    let service = IntakeService::new(repository, archive.clone(), None);

    let mut session = IntakeSession::new();
    session.advance_to(IntakeStage::Registration)?;

    let submission = RegistrationSubmission {
        national_id: "28.555.111".to_string(),
        given_name: "lucía".to_string(),
        family_name: "moreno".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1972, 4, 18).unwrap_or(today),
        biological_sex: BiologicalSex::Female,
        self_perceived_gender: None,
        email: "Lucia.Moreno@example.com".to_string(),
        phone: "+54 9 11 4444-0000".to_string(),
    };
    let record = service.register(submission, today)?;
    println!(
        "- Registered {} {} (DNI {})",
        record.given_name, record.family_name, record.national_id
    );

    session.advance_to(IntakeStage::RiskQuestionnaire)?;
    let questionnaire = RiskQuestionnaire {
        weight_kg: 78.0,
        height_cm: 158.0,
        answers: [
            (RiskFactor::Smoker, TernaryAnswer::Yes),
            (RiskFactor::SmokerTwentyYears, TernaryAnswer::Yes),
            (RiskFactor::Hypertension, TernaryAnswer::Unknown),
            (RiskFactor::FamilyHistoryBreast, TernaryAnswer::Yes),
        ]
        .into_iter()
        .collect(),
        other_cancer: None,
        other_condition: None,
    };
    let (record, profile) = service.profile_for(&record.national_id, questionnaire, today)?;

    session.advance_to(IntakeStage::PatientRecommendations)?;
    render_recommendations(&record.given_name, &profile, catalog);
    session.advance_to(IntakeStage::CareTeamRecommendations)?;

    if let Some(path) = attach {
        let bytes = std::fs::read(&path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "documento".to_string());
        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();
        let reference = service.attach_document(
            &record.national_id,
            &PatientDocument {
                file_name,
                content_type,
                bytes,
            },
        )?;
        println!("\nArchived document as {}", reference.file_id);
        println!("Documents held in memory: {}", archive.uploads().len());
    }

    Ok(())
}

/// Machine-readable projection of one evaluation, printed alongside the
/// human-readable listing so the output can be piped into other tooling.
#[derive(Debug, Serialize)]
struct EvaluationPayload<'a> {
    bmi: f64,
    bmi_label: &'static str,
    patient_advice: &'a [AdvisoryMessage],
    care_team_actions: &'a [ClinicalAction],
    catalog_available: bool,
}

fn render_recommendations(name: &str, profile: &ConditionProfile, catalog: Option<PathBuf>) {
    let bmi = classify(profile.weight_kg, profile.height_cm);
    println!(
        "\nIMC: {:.1} ({})",
        bmi.value,
        bmi.category.label()
    );

    let advice = patient_recommendations(name, profile, bmi.value);
    if advice.is_empty() {
        println!("\nPatient guidance: none triggered");
    } else {
        println!("\nPatient guidance");
        for message in &advice {
            println!("- [{:?}] {}: {}", message.severity, message.topic, message.detail);
        }
    }

    let actions = care_team_recommendations(profile);
    if actions.is_empty() {
        println!("\nCare team actions: none triggered");
    } else {
        println!("\nCare team actions");
        for action in &actions {
            println!("- {}: {}", action.topic, action.detail);
        }
    }

    let sources = sources_with_catalog(catalog);
    let source = catalog_source(&sources);
    let outcome = recommend(profile, &bmi, source.as_ref());
    if !outcome.catalog_available {
        println!("\nIntervention catalog: unavailable (showing fixed rules only)");
    } else {
        render_interventions(&outcome.set);
    }

    let payload = EvaluationPayload {
        bmi: bmi.value,
        bmi_label: bmi.category.label(),
        patient_advice: &advice,
        care_team_actions: &actions,
        catalog_available: outcome.catalog_available,
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("\nMachine-readable payload:\n{json}"),
        Err(error) => println!("\nCould not serialize the evaluation payload: {error}"),
    }
}


fn render_interventions(set: &RecommendationSet) {
    if set.is_empty() {
        println!("\nCatalog interventions: none apply");
        return;
    }

    println!("\nCatalog interventions");
    for group in &set.groups {
        println!("{}", group.category);
        for rule in &group.rules {
            if rule.explanation.is_empty() {
                println!("  - {}", rule.name);
            } else {
                println!("  - {}: {}", rule.name, rule.explanation);
            }
        }
    }

    println!("\nSummary checklist");
    for row in &set.summary {
        println!("- {} ({})", row.name, row.category);
    }
}
