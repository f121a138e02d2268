//! Budget plan routes.
//!
//! Paths carry the budget type (`opex` or `capex`); a plan requested under the
//! wrong type is reported as not found.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use itbudget_core::budget::{
    BudgetPlan, BudgetService, BudgetTransaction, BudgetType, PlanClassification, PlanFilter,
    PlanFilterOptions, PlanUsage, TransactionStatus, UsageTotals,
};
use itbudget_db::repositories::{
    CreatePlanInput, CreateTransactionInput, PlanRepository, PlanWithUsage,
    TransactionRepository,
};
use itbudget_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Routes open to any signed-in user.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/{budget_type}", get(list_plans))
        .route(
            "/budgets/{budget_type}/filter-options",
            get(get_filter_options),
        )
        .route("/budgets/{budget_type}/{plan_id}", get(get_plan))
        .route(
            "/budgets/{budget_type}/{plan_id}/transactions",
            post(create_transaction),
        )
}

/// Routes that require the admin role.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/{budget_type}", post(create_plan))
        .route("/budgets/{budget_type}/{plan_id}", delete(delete_plan))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing plans.
#[derive(Debug, Default, Deserialize)]
pub struct ListPlansQuery {
    /// Budgeting year.
    pub year: Option<i32>,
    /// Exact OPEX category.
    pub category: Option<String>,
    /// Exact OPEX chart-of-accounts code.
    pub coa: Option<String>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
}

/// Request body for creating a plan.
///
/// OPEX plans take `coa`, `category` and `component`; CAPEX plans take
/// `item_code`, `item_description` and `capex_number`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    /// Budgeting year.
    #[validate(range(min = 2000, max = 2099))]
    pub year: i32,
    /// Allocated amount.
    #[validate(custom(function = "validate_amount"))]
    pub planned_amount: Decimal,
    /// Chart-of-accounts code.
    #[validate(length(max = 100))]
    pub coa: Option<String>,
    /// Spending category.
    #[validate(length(max = 255))]
    pub category: Option<String>,
    /// Component within the category.
    #[validate(length(max = 255))]
    pub component: Option<String>,
    /// Asset item code.
    #[validate(length(max = 100))]
    pub item_code: Option<String>,
    /// Asset item description.
    #[validate(length(max = 2000))]
    pub item_description: Option<String>,
    /// CAPEX approval number.
    #[validate(length(max = 100))]
    pub capex_number: Option<String>,
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    /// Amount in the smallest currency unit.
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    /// What the money was spent on.
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    /// Vendor name.
    #[validate(length(max = 255))]
    pub vendor: Option<String>,
    /// Date of the expense; today when omitted.
    pub transaction_date: Option<NaiveDate>,
    /// Initial status; `draft` when omitted.
    pub status: Option<TransactionStatus>,
}

/// Plans of one type with their usage and the totals over them.
#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    /// Budget type listed.
    pub budget_type: BudgetType,
    /// Matching plans.
    pub plans: Vec<PlanWithUsage>,
    /// Totals over `plans`.
    pub totals: UsageTotals,
}

/// One plan with its transactions.
#[derive(Debug, Serialize)]
pub struct PlanDetailResponse {
    /// The plan.
    pub plan: BudgetPlan,
    /// Usage derived from `transactions`.
    pub usage: PlanUsage,
    /// Transactions charged to the plan.
    pub transactions: Vec<BudgetTransaction>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    BudgetService::validate_amount(*amount).map_err(|e| {
        let mut err = ValidationError::new("amount");
        err.message = Some(e.to_string().into());
        err
    })
}

pub(crate) fn parse_budget_type(raw: &str) -> Result<BudgetType, AppError> {
    raw.parse().map_err(AppError::Validation)
}

/// Trims and drops blank descriptive fields.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn classification(
    budget_type: BudgetType,
    req: CreatePlanRequest,
) -> Result<PlanClassification, AppError> {
    let foreign = match budget_type {
        BudgetType::Opex => [
            ("item_code", &req.item_code),
            ("item_description", &req.item_description),
            ("capex_number", &req.capex_number),
        ],
        BudgetType::Capex => [
            ("coa", &req.coa),
            ("category", &req.category),
            ("component", &req.component),
        ],
    };
    if let Some((field, _)) = foreign.iter().find(|(_, v)| v.is_some()) {
        return Err(AppError::Validation(format!(
            "{field} does not apply to {budget_type} plans"
        )));
    }

    Ok(match budget_type {
        BudgetType::Opex => PlanClassification::Opex {
            coa: clean(req.coa),
            category: clean(req.category),
            component: clean(req.component),
        },
        BudgetType::Capex => PlanClassification::Capex {
            item_code: clean(req.item_code),
            item_description: clean(req.item_description),
            capex_number: clean(req.capex_number),
        },
    })
}

async fn find_plan(
    repo: &PlanRepository,
    budget_type: BudgetType,
    plan_id: Uuid,
) -> ApiResult<BudgetPlan> {
    let plan = repo.get_plan(plan_id).await?;
    if plan.budget_type() != budget_type {
        return Err(AppError::NotFound(format!("{budget_type} plan {plan_id}")).into());
    }
    Ok(plan)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /budgets/{budget_type} - List plans with usage.
async fn list_plans(
    State(state): State<AppState>,
    Path(budget_type): Path<String>,
    Query(query): Query<ListPlansQuery>,
) -> ApiResult<Json<PlanListResponse>> {
    let budget_type = parse_budget_type(&budget_type)?;
    let filter = PlanFilter {
        budget_type: Some(budget_type),
        year: query.year,
        category: query.category,
        coa: query.coa,
        search: query.search,
    };

    let plans = PlanRepository::new((*state.db).clone())
        .list_plans_with_usage(&filter)
        .await?;
    let totals = UsageTotals::from_usages(plans.iter().map(|p| &p.usage));

    Ok(Json(PlanListResponse {
        budget_type,
        plans,
        totals,
    }))
}

/// POST /budgets/{budget_type} - Create a plan.
async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_type): Path<String>,
    Json(payload): Json<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<BudgetPlan>)> {
    let budget_type = parse_budget_type(&budget_type)?;
    payload.validate()?;

    let input = CreatePlanInput {
        year: payload.year,
        planned_amount: payload.planned_amount,
        classification: classification(budget_type, payload)?,
        created_by: auth.user_id(),
    };

    let plan = PlanRepository::new((*state.db).clone())
        .create_plan(input, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /budgets/{budget_type}/filter-options - Distinct values for list filters.
async fn get_filter_options(
    State(state): State<AppState>,
    Path(budget_type): Path<String>,
) -> ApiResult<Json<PlanFilterOptions>> {
    let budget_type = parse_budget_type(&budget_type)?;
    let options = PlanRepository::new((*state.db).clone())
        .filter_options(budget_type)
        .await?;
    Ok(Json(options))
}

/// GET /budgets/{budget_type}/{plan_id} - Plan detail with transactions.
async fn get_plan(
    State(state): State<AppState>,
    Path((budget_type, plan_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<PlanDetailResponse>> {
    let budget_type = parse_budget_type(&budget_type)?;
    let plan = find_plan(&PlanRepository::new((*state.db).clone()), budget_type, plan_id).await?;

    let transactions = TransactionRepository::new((*state.db).clone())
        .list_for_plan(plan.id)
        .await?;
    let usage = PlanUsage::from_transactions(&plan, &transactions);

    Ok(Json(PlanDetailResponse {
        plan,
        usage,
        transactions,
    }))
}

/// DELETE /budgets/{budget_type}/{plan_id} - Delete a CAPEX plan.
async fn delete_plan(
    State(state): State<AppState>,
    Path((budget_type, plan_id)): Path<(String, Uuid)>,
) -> ApiResult<StatusCode> {
    let budget_type = parse_budget_type(&budget_type)?;
    let repo = PlanRepository::new((*state.db).clone());
    find_plan(&repo, budget_type, plan_id).await?;

    repo.delete_plan(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /budgets/{budget_type}/{plan_id}/transactions - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((budget_type, plan_id)): Path<(String, Uuid)>,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<BudgetTransaction>)> {
    let budget_type = parse_budget_type(&budget_type)?;
    payload.validate()?;

    let now = Utc::now();
    let input = CreateTransactionInput {
        budget_plan_id: plan_id,
        budget_type,
        amount: payload.amount,
        status: payload.status.unwrap_or(TransactionStatus::Draft),
        description: payload.description.trim().to_string(),
        vendor: clean(payload.vendor),
        transaction_date: payload.transaction_date.unwrap_or_else(|| now.date_naive()),
        created_by: auth.user_id(),
    };

    let transaction = TransactionRepository::new((*state.db).clone())
        .create_transaction(input, now)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn request() -> CreatePlanRequest {
        CreatePlanRequest {
            year: 2025,
            planned_amount: dec!(1000),
            coa: None,
            category: None,
            component: None,
            item_code: None,
            item_description: None,
            capex_number: None,
        }
    }

    #[rstest]
    #[case("opex", Some(BudgetType::Opex))]
    #[case("CAPEX", Some(BudgetType::Capex))]
    #[case("travel", None)]
    fn test_parse_budget_type(#[case] raw: &str, #[case] expected: Option<BudgetType>) {
        assert_eq!(parse_budget_type(raw).ok(), expected);
    }

    #[test]
    fn test_opex_classification_trims_fields() {
        let req = CreatePlanRequest {
            category: Some("  Licenses ".to_string()),
            coa: Some("   ".to_string()),
            ..request()
        };

        let classification = classification(BudgetType::Opex, req).unwrap();
        assert_eq!(
            classification,
            PlanClassification::Opex {
                coa: None,
                category: Some("Licenses".to_string()),
                component: None,
            }
        );
    }

    #[test]
    fn test_foreign_fields_are_rejected() {
        let req = CreatePlanRequest {
            category: Some("Licenses".to_string()),
            ..request()
        };

        let err = classification(BudgetType::Capex, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("category")));
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(150000), true)]
    #[case(dec!(-1), false)]
    #[case(dec!(10.5), false)]
    fn test_amount_validation(#[case] amount: Decimal, #[case] valid: bool) {
        let req = CreatePlanRequest {
            planned_amount: amount,
            ..request()
        };
        assert_eq!(req.validate().is_ok(), valid);
    }

    #[test]
    fn test_year_out_of_range_is_invalid() {
        let req = CreatePlanRequest {
            year: 1999,
            ..request()
        };
        assert!(req.validate().is_err());
    }
}
