//! Recommendation aggregation: evaluate every catalog rule against a profile,
//! group the matches by category in the fixed display order, and project a
//! flat summary table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bmi::BmiResult;
use super::catalog::{CatalogSource, InterventionRule};
use super::criteria::{self, VariableScope};
use super::domain::ConditionProfile;

/// One category bucket; rules keep their catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub rules: Vec<InterventionRule>,
}

/// Flat projection for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub groups: Vec<CategoryGroup>,
    pub summary: Vec<SummaryRow>,
}

impl RecommendationSet {
    /// No matches is a valid outcome: "no urgent recommendations".
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

const CATEGORY_ORDER: [&str; 4] = ["Cáncer", "Cardiovascular", "Vacunas", "Consejería"];

fn category_rank(category: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|known| category.eq_ignore_ascii_case(known))
        .unwrap_or(CATEGORY_ORDER.len())
}

/// Evaluate the catalog against a profile. Rules are visited in catalog
/// order, so grouping is stable and repeated runs over the same snapshot
/// return identical output.
pub fn aggregate(
    profile: &ConditionProfile,
    bmi: &BmiResult,
    catalog: &[InterventionRule],
) -> RecommendationSet {
    let scope = VariableScope::for_profile(profile, bmi);
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut summary = Vec::new();

    for rule in catalog {
        if !criteria::evaluate(&rule.criterion, &scope) {
            continue;
        }
        summary.push(SummaryRow {
            name: rule.name.clone(),
            category: rule.category.clone(),
        });
        match groups
            .iter_mut()
            .find(|group| group.category == rule.category)
        {
            Some(group) => group.rules.push(rule.clone()),
            None => groups.push(CategoryGroup {
                category: rule.category.clone(),
                rules: vec![rule.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| {
        category_rank(&a.category)
            .cmp(&category_rank(&b.category))
            .then_with(|| a.category.cmp(&b.category))
    });

    RecommendationSet { groups, summary }
}

/// Grouped result plus whether the external catalog could actually be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationOutcome {
    pub set: RecommendationSet,
    pub catalog_available: bool,
}

/// Fetch the catalog and aggregate, degrading an unreachable source to an
/// empty set with a surfaced warning. The static screening rules do not go
/// through here and keep working regardless.
pub fn recommend(
    profile: &ConditionProfile,
    bmi: &BmiResult,
    source: &dyn CatalogSource,
) -> RecommendationOutcome {
    match source.fetch() {
        Ok(catalog) => RecommendationOutcome {
            set: aggregate(profile, bmi, &catalog),
            catalog_available: true,
        },
        Err(error) => {
            warn!(%error, "intervention catalog unreachable; returning empty recommendation set");
            RecommendationOutcome {
                set: RecommendationSet::default(),
                catalog_available: false,
            }
        }
    }
}
