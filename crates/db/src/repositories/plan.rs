//! Budget plan repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use itbudget_core::budget::{
    BudgetError, BudgetPlan, BudgetService, BudgetType as CoreBudgetType, PlanClassification,
    PlanFilter, PlanFilterOptions, PlanUsage, SequenceAllocator, SequenceError, SequenceKind,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::sequence::PgSequenceStore;
use crate::entities::{budget_plans, budget_transactions, sea_orm_active_enums::BudgetType};

/// Error types for plan operations.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Plan not found.
    #[error("Budget plan not found: {0}")]
    NotFound(Uuid),

    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Display ID could not be allocated.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a plan.
#[derive(Debug, Clone)]
pub struct CreatePlanInput {
    /// Budgeting year.
    pub year: i32,
    /// Allocated amount.
    pub planned_amount: Decimal,
    /// OPEX or CAPEX descriptive fields; also selects the budget type.
    pub classification: PlanClassification,
    /// Creating user.
    pub created_by: Uuid,
}

/// A plan together with its aggregated usage.
#[derive(Debug, Clone, Serialize)]
pub struct PlanWithUsage {
    /// The plan.
    pub plan: BudgetPlan,
    /// Usage derived from the plan's transactions.
    pub usage: PlanUsage,
}

/// Budget plan repository.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    db: DatabaseConnection,
}

impl PlanRepository {
    /// Creates a new plan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a plan and assigns its display ID from the year of `now`.
    ///
    /// Allocation and insert share one database transaction.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Budget` for an invalid amount, `PlanError::Sequence`
    /// when no display ID can be allocated, or a database error.
    pub async fn create_plan(
        &self,
        input: CreatePlanInput,
        now: DateTime<Utc>,
    ) -> Result<BudgetPlan, PlanError> {
        BudgetService::validate_amount(input.planned_amount)?;
        let budget_type = input.classification.budget_type();

        let txn = self.db.begin().await?;

        let allocator = SequenceAllocator::new(PgSequenceStore::new(&txn));
        let display_id = allocator
            .allocate(SequenceKind::Plan(budget_type), now)
            .await?;

        let timestamp = now.into();
        let mut plan = budget_plans::ActiveModel {
            id: Set(Uuid::new_v4()),
            display_id: Set(display_id),
            budget_type: Set(budget_type.into()),
            year: Set(input.year),
            planned_amount: Set(input.planned_amount),
            realized_amount: Set(Decimal::ZERO),
            remaining_amount: Set(input.planned_amount),
            coa: Set(None),
            category: Set(None),
            component: Set(None),
            item_code: Set(None),
            item_description: Set(None),
            capex_number: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        match input.classification {
            PlanClassification::Opex {
                coa,
                category,
                component,
            } => {
                plan.coa = Set(coa);
                plan.category = Set(category);
                plan.component = Set(component);
            }
            PlanClassification::Capex {
                item_code,
                item_description,
                capex_number,
            } => {
                plan.item_code = Set(item_code);
                plan.item_description = Set(item_description);
                plan.capex_number = Set(capex_number);
            }
        }

        let created = plan.insert(&txn).await?;
        txn.commit().await?;

        info!(
            plan_id = %created.id,
            display_id = %created.display_id,
            budget_type = %budget_type,
            "Budget plan created"
        );

        Ok(created.into())
    }

    /// Finds a plan by ID.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` if the plan does not exist.
    pub async fn get_plan(&self, id: Uuid) -> Result<BudgetPlan, PlanError> {
        budget_plans::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or(PlanError::NotFound(id))
    }

    /// Lists plans matching `filter`, ordered by display ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<BudgetPlan>, PlanError> {
        let plans = apply_filter(budget_plans::Entity::find(), filter)
            .order_by_asc(budget_plans::Column::DisplayId)
            .all(&self.db)
            .await?;

        Ok(plans.into_iter().map(Into::into).collect())
    }

    /// Lists plans matching `filter` with usage summed from their transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn list_plans_with_usage(
        &self,
        filter: &PlanFilter,
    ) -> Result<Vec<PlanWithUsage>, PlanError> {
        let plans = self.list_plans(filter).await?;
        if plans.is_empty() {
            return Ok(vec![]);
        }

        let plan_ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
        let sums: Vec<(Uuid, Option<Decimal>)> = budget_transactions::Entity::find()
            .filter(budget_transactions::Column::BudgetPlanId.is_in(plan_ids))
            .select_only()
            .column(budget_transactions::Column::BudgetPlanId)
            .column_as(budget_transactions::Column::Amount.sum(), "used")
            .group_by(budget_transactions::Column::BudgetPlanId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let used_by_plan: HashMap<Uuid, Decimal> = sums
            .into_iter()
            .map(|(plan_id, used)| (plan_id, used.unwrap_or(Decimal::ZERO)))
            .collect();

        Ok(plans
            .into_iter()
            .map(|plan| {
                let used = used_by_plan.get(&plan.id).copied().unwrap_or(Decimal::ZERO);
                let usage = PlanUsage::from_total(&plan, used);
                PlanWithUsage { plan, usage }
            })
            .collect())
    }

    /// Deletes a CAPEX plan and, through the foreign key, its transactions.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` if the plan does not exist and
    /// `PlanError::Budget` for OPEX plans.
    pub async fn delete_plan(&self, id: Uuid) -> Result<BudgetPlan, PlanError> {
        let txn = self.db.begin().await?;

        let model = budget_plans::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PlanError::NotFound(id))?;

        let plan: BudgetPlan = model.clone().into();
        BudgetService::ensure_deletable(&plan)?;

        model.delete(&txn).await?;
        txn.commit().await?;

        info!(plan_id = %plan.id, display_id = %plan.display_id, "Budget plan deleted");
        Ok(plan)
    }

    /// Derives the filter option lists for one budget type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn filter_options(
        &self,
        budget_type: CoreBudgetType,
    ) -> Result<PlanFilterOptions, PlanError> {
        let plans = self.list_plans(&PlanFilter::for_type(budget_type)).await?;
        Ok(PlanFilterOptions::from_plans(&plans))
    }
}

fn apply_filter(
    mut query: Select<budget_plans::Entity>,
    filter: &PlanFilter,
) -> Select<budget_plans::Entity> {
    if let Some(budget_type) = filter.budget_type {
        query = query.filter(budget_plans::Column::BudgetType.eq(BudgetType::from(budget_type)));
    }
    if let Some(year) = filter.year {
        query = query.filter(budget_plans::Column::Year.eq(year));
    }
    if let Some(category) = filter.category() {
        query = query.filter(budget_plans::Column::Category.eq(category));
    }
    if let Some(coa) = filter.coa() {
        query = query.filter(budget_plans::Column::Coa.eq(coa));
    }
    if let Some(pattern) = filter.search_pattern() {
        let searchable = [
            budget_plans::Column::DisplayId,
            budget_plans::Column::Coa,
            budget_plans::Column::Category,
            budget_plans::Column::Component,
            budget_plans::Column::ItemCode,
            budget_plans::Column::ItemDescription,
            budget_plans::Column::CapexNumber,
        ];
        let condition = searchable.into_iter().fold(Condition::any(), |cond, column| {
            cond.add(
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        });
        query = query.filter(condition);
    }
    query
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
