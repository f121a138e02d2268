//! Filter options and list filters for budget plans.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::{BudgetPlan, BudgetType, PlanClassification};

/// Distinct trimmed non-empty values, sorted ascending.
///
/// `None` and blank values are dropped.
#[must_use]
pub fn distinct_options<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flatten()
        .filter_map(|v| {
            let trimmed = v.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, newest first.
#[must_use]
pub fn distinct_years<I>(years: I) -> Vec<i32>
where
    I: IntoIterator<Item = i32>,
{
    years
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Values available to filter a plan list by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanFilterOptions {
    /// Budgeting years, newest first.
    pub years: Vec<i32>,
    /// OPEX categories.
    pub categories: Vec<String>,
    /// OPEX chart-of-accounts codes.
    pub coas: Vec<String>,
    /// OPEX components.
    pub components: Vec<String>,
    /// CAPEX item codes.
    pub item_codes: Vec<String>,
    /// CAPEX approval numbers.
    pub capex_numbers: Vec<String>,
}

impl PlanFilterOptions {
    /// Derives the option lists from a set of plans.
    #[must_use]
    pub fn from_plans(plans: &[BudgetPlan]) -> Self {
        let opex = || {
            plans.iter().filter_map(|p| match &p.classification {
                PlanClassification::Opex {
                    coa,
                    category,
                    component,
                } => Some((coa, category, component)),
                PlanClassification::Capex { .. } => None,
            })
        };
        let capex = || {
            plans.iter().filter_map(|p| match &p.classification {
                PlanClassification::Capex {
                    item_code,
                    capex_number,
                    ..
                } => Some((item_code, capex_number)),
                PlanClassification::Opex { .. } => None,
            })
        };

        Self {
            years: distinct_years(plans.iter().map(|p| p.year)),
            categories: distinct_options(opex().map(|(_, category, _)| category.as_deref())),
            coas: distinct_options(opex().map(|(coa, _, _)| coa.as_deref())),
            components: distinct_options(opex().map(|(_, _, component)| component.as_deref())),
            item_codes: distinct_options(capex().map(|(code, _)| code.as_deref())),
            capex_numbers: distinct_options(capex().map(|(_, number)| number.as_deref())),
        }
    }
}

/// Criteria for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFilter {
    /// Restrict to one budget type.
    pub budget_type: Option<BudgetType>,
    /// Restrict to one year.
    pub year: Option<i32>,
    /// Exact OPEX category.
    pub category: Option<String>,
    /// Exact OPEX chart-of-accounts code.
    pub coa: Option<String>,
    /// Case-insensitive substring of display ID or description fields.
    pub search: Option<String>,
}

impl PlanFilter {
    /// Creates a filter for one budget type.
    #[must_use]
    pub fn for_type(budget_type: BudgetType) -> Self {
        Self {
            budget_type: Some(budget_type),
            ..Self::default()
        }
    }

    /// Restricts the filter to a year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Category with surrounding whitespace removed, if any remains.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// COA with surrounding whitespace removed, if any remains.
    #[must_use]
    pub fn coa(&self) -> Option<&str> {
        non_blank(self.coa.as_deref())
    }

    /// Lowercased search term wrapped for a `LIKE` match.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        non_blank(self.search.as_deref()).map(|s| {
            let escaped = s
                .to_lowercase()
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
