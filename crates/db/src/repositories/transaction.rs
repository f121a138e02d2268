//! Budget transaction repository.
//!
//! Every mutation locks the owning plan row first, so concurrent charges to
//! one plan apply their balance updates one after another and
//! `remaining_amount = planned_amount - realized_amount` holds at each commit.

use chrono::{DateTime, NaiveDate, Utc};
use itbudget_core::budget::{
    BudgetError, BudgetPlan, BudgetService, BudgetTransaction, BudgetType as CoreBudgetType,
    PlanBalance, SequenceAllocator, SequenceError, SequenceKind,
    TransactionStatus as CoreStatus,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::sequence::PgSequenceStore;
use crate::entities::{
    budget_plans, budget_transactions, sea_orm_active_enums::TransactionStatus,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Plan the transaction refers to does not exist.
    #[error("Budget plan not found: {0}")]
    PlanNotFound(Uuid),

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

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Plan to charge.
    pub budget_plan_id: Uuid,
    /// Budget type the caller expects the plan to have.
    pub budget_type: CoreBudgetType,
    /// Amount in the smallest currency unit.
    pub amount: Decimal,
    /// Initial workflow state.
    pub status: CoreStatus,
    /// Free-text description.
    pub description: String,
    /// Optional vendor.
    pub vendor: Option<String>,
    /// Date the expense occurred.
    pub transaction_date: NaiveDate,
    /// Recording user.
    pub created_by: Uuid,
}

/// Budget transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction and charges it to its plan.
    ///
    /// The display ID comes from the year of `now`. Plan lock, allocation,
    /// insert and balance update share one database transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::PlanNotFound`, `TransactionError::Budget`
    /// for a type mismatch or invalid amount, `TransactionError::Sequence`
    /// when allocation fails, or a database error.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
        now: DateTime<Utc>,
    ) -> Result<BudgetTransaction, TransactionError> {
        let txn = self.db.begin().await?;

        let plan_model = lock_plan(&txn, input.budget_plan_id).await?;
        let plan: BudgetPlan = plan_model.clone().into();
        BudgetService::validate_transaction(&plan, input.budget_type, input.amount)?;

        let allocator = SequenceAllocator::new(PgSequenceStore::new(&txn));
        let display_id = allocator
            .allocate(SequenceKind::Transaction(input.budget_type), now)
            .await?;

        let timestamp = now.into();
        let transaction = budget_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            display_id: Set(display_id),
            budget_plan_id: Set(plan.id),
            budget_type: Set(input.budget_type.into()),
            amount: Set(input.amount),
            status: Set(input.status.into()),
            description: Set(input.description),
            vendor: Set(input.vendor),
            transaction_date: Set(input.transaction_date),
            created_by: Set(input.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        let balance = PlanBalance::with_realized(plan.planned_amount, plan.realized_amount)
            .record(input.amount);
        apply_balance(&txn, plan_model, balance, now).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            display_id = %transaction.display_id,
            plan_id = %plan.id,
            amount = %input.amount,
            "Budget transaction recorded"
        );

        Ok(transaction.into())
    }

    /// Deletes a transaction and reverses its charge on the plan.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn delete_transaction(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<BudgetTransaction, TransactionError> {
        let txn = self.db.begin().await?;

        let plan_id = budget_transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?
            .budget_plan_id;

        // A concurrent delete may have committed while this one waited on the plan lock.
        let plan_model = lock_plan(&txn, plan_id).await.map_err(|e| match e {
            TransactionError::PlanNotFound(_) => TransactionError::NotFound(id),
            other => other,
        })?;
        let transaction = budget_transactions::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let balance =
            PlanBalance::with_realized(plan_model.planned_amount, plan_model.realized_amount)
                .reverse(transaction.amount);

        let deleted = transaction.clone().delete(&txn).await?;
        if deleted.rows_affected != 1 {
            return Err(TransactionError::NotFound(id));
        }
        apply_balance(&txn, plan_model, balance, now).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            display_id = %transaction.display_id,
            "Budget transaction deleted"
        );

        Ok(transaction.into())
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<BudgetTransaction, TransactionError> {
        budget_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or(TransactionError::NotFound(id))
    }

    /// Lists a plan's transactions, ordered by display ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_plan(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<BudgetTransaction>, TransactionError> {
        let transactions = budget_transactions::Entity::find()
            .filter(budget_transactions::Column::BudgetPlanId.eq(plan_id))
            .order_by_asc(budget_transactions::Column::DisplayId)
            .all(&self.db)
            .await?;

        Ok(transactions.into_iter().map(Into::into).collect())
    }

    /// Moves a transaction to another workflow state.
    ///
    /// Status is informational; plan balances are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: CoreStatus,
        now: DateTime<Utc>,
    ) -> Result<BudgetTransaction, TransactionError> {
        let transaction = budget_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let mut active = transaction.into_active_model();
        active.status = Set(TransactionStatus::from(status));
        active.updated_at = Set(now.into());
        let updated = active.update(&self.db).await?;

        info!(transaction_id = %id, status = ?status, "Budget transaction status changed");
        Ok(updated.into())
    }
}

async fn lock_plan(
    txn: &DatabaseTransaction,
    plan_id: Uuid,
) -> Result<budget_plans::Model, TransactionError> {
    budget_plans::Entity::find_by_id(plan_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(TransactionError::PlanNotFound(plan_id))
}

async fn apply_balance(
    txn: &DatabaseTransaction,
    plan: budget_plans::Model,
    balance: PlanBalance,
    now: DateTime<Utc>,
) -> Result<budget_plans::Model, DbErr> {
    let mut active = plan.into_active_model();
    active.realized_amount = Set(balance.realized);
    active.remaining_amount = Set(balance.remaining);
    active.updated_at = Set(now.into());
    active.update(txn).await
}
