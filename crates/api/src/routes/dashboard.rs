//! Dashboard summary route.
//!
//! Every total is summed from plan usages first; percentages are derived from
//! those sums, never averaged.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Datelike, Utc};
use itbudget_core::budget::{BudgetType, PlanFilter, PlanUsage, UsageTotals, group_usage};
use itbudget_db::repositories::{PlanRepository, PlanWithUsage};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(get_summary))
}

/// Query parameters for the summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Budgeting year; the current year when omitted.
    pub year: Option<i32>,
}

/// Totals of one chart bucket.
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    /// Budget type of the bucket.
    pub budget_type: BudgetType,
    /// Category (OPEX) or item code (CAPEX).
    pub label: String,
    /// Totals over the bucket's plans.
    pub totals: UsageTotals,
}

/// Dashboard summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Year summarized.
    pub year: i32,
    /// Totals over every plan of the year.
    pub overall: UsageTotals,
    /// OPEX totals.
    pub opex: UsageTotals,
    /// CAPEX totals.
    pub capex: UsageTotals,
    /// Per category / item code breakdown.
    pub groups: Vec<GroupSummary>,
    /// Plans ordered by usage percentage, highest first.
    pub top_plans: Vec<PlanUsage>,
}

const TOP_PLAN_COUNT: usize = 5;

pub(crate) fn summarize(year: i32, plans: &[PlanWithUsage]) -> SummaryResponse {
    let of_type = |t: BudgetType| {
        UsageTotals::from_usages(
            plans
                .iter()
                .filter(move |p| p.usage.budget_type == t)
                .map(|p| &p.usage),
        )
    };

    let groups = group_usage(
        plans
            .iter()
            .map(|p| ((p.usage.budget_type, p.plan.group_label()), &p.usage)),
    )
    .into_iter()
    .map(|((budget_type, label), totals)| GroupSummary {
        budget_type,
        label,
        totals,
    })
    .collect();

    let mut top_plans: Vec<PlanUsage> = plans.iter().map(|p| p.usage.clone()).collect();
    top_plans.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.display_id.cmp(&b.display_id))
    });
    top_plans.truncate(TOP_PLAN_COUNT);

    SummaryResponse {
        year,
        overall: UsageTotals::from_usages(plans.iter().map(|p| &p.usage)),
        opex: of_type(BudgetType::Opex),
        capex: of_type(BudgetType::Capex),
        groups,
        top_plans,
    }
}

/// GET /dashboard/summary - Totals for one year.
async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let plans = PlanRepository::new((*state.db).clone())
        .list_plans_with_usage(&PlanFilter::default().with_year(year))
        .await?;

    Ok(Json(summarize(year, &plans)))
}
