//! Postgres-backed display-ID counters.
//!
//! The store borrows a connection, so it runs inside whichever database
//! transaction inserts the row that receives the identifier. A rolled back
//! insert rolls back its counter increment too, and numbering stays gap-free.

use itbudget_core::budget::{SequenceError, SequenceKind, SequenceStore};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Statement,
};

use crate::entities::{
    budget_plans, budget_transactions, sea_orm_active_enums::BudgetType,
};

/// Upserts the partition counter to `max(last_value, seed) + 1`.
///
/// The row lock taken by the conflicting update serializes concurrent callers
/// until the owning transaction ends.
const INCREMENT_SQL: &str = r"
INSERT INTO display_id_counters (sequence, year_prefix, last_value, updated_at)
VALUES ($1, $2, $3 + 1, now())
ON CONFLICT (sequence, year_prefix) DO UPDATE
SET last_value = GREATEST(display_id_counters.last_value, $3) + 1,
    updated_at = now()
RETURNING last_value
";

/// Matches identifiers whose last four characters are a running number.
/// Malformed identifiers sort above well-formed ones and would hide the maximum.
const RUNNING_NUMBER_PATTERN: &str = "[0-9]{4}$";

/// Sequence store over a borrowed connection or transaction.
#[derive(Debug)]
pub struct PgSequenceStore<'a, C> {
    conn: &'a C,
}

impl<'a, C> PgSequenceStore<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Creates a store that reads and writes through `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn latest_plan_id(
        &self,
        budget_type: BudgetType,
        partition_prefix: &str,
    ) -> Result<Option<String>, DbErr> {
        budget_plans::Entity::find()
            .filter(budget_plans::Column::BudgetType.eq(budget_type))
            .filter(budget_plans::Column::DisplayId.starts_with(partition_prefix))
            .filter(Expr::cust_with_values(
                "\"budget_plans\".\"display_id\" ~ $1",
                [RUNNING_NUMBER_PATTERN],
            ))
            .order_by_desc(budget_plans::Column::DisplayId)
            .select_only()
            .column(budget_plans::Column::DisplayId)
            .into_tuple()
            .one(self.conn)
            .await
    }

    async fn latest_transaction_id(
        &self,
        budget_type: BudgetType,
        partition_prefix: &str,
    ) -> Result<Option<String>, DbErr> {
        budget_transactions::Entity::find()
            .filter(budget_transactions::Column::BudgetType.eq(budget_type))
            .filter(budget_transactions::Column::DisplayId.starts_with(partition_prefix))
            .filter(Expr::cust_with_values(
                "\"budget_transactions\".\"display_id\" ~ $1",
                [RUNNING_NUMBER_PATTERN],
            ))
            .order_by_desc(budget_transactions::Column::DisplayId)
            .select_only()
            .column(budget_transactions::Column::DisplayId)
            .into_tuple()
            .one(self.conn)
            .await
    }
}

impl<C> SequenceStore for PgSequenceStore<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn latest_display_id(
        &self,
        kind: SequenceKind,
        partition_prefix: &str,
    ) -> Result<Option<String>, SequenceError> {
        let budget_type = BudgetType::from(kind.budget_type());
        let latest = match kind {
            SequenceKind::Plan(_) => self.latest_plan_id(budget_type, partition_prefix).await,
            SequenceKind::Transaction(_) => {
                self.latest_transaction_id(budget_type, partition_prefix)
                    .await
            }
        };
        latest.map_err(persistence)
    }

    async fn increment(
        &self,
        kind: SequenceKind,
        year_prefix: &str,
        seed: u32,
    ) -> Result<u32, SequenceError> {
        let seed = i32::try_from(seed)
            .map_err(|_| SequenceError::Persistence(format!("seed {seed} out of range")))?;

        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                INCREMENT_SQL,
                [kind.key().into(), year_prefix.into(), seed.into()],
            ))
            .await
            .map_err(persistence)?
            .ok_or_else(|| SequenceError::Persistence("counter upsert returned no row".into()))?;

        let value: i32 = row.try_get("", "last_value").map_err(persistence)?;
        u32::try_from(value)
            .map_err(|_| SequenceError::Persistence(format!("counter value {value} is negative")))
    }
}

fn persistence(err: DbErr) -> SequenceError {
    SequenceError::Persistence(err.to_string())
}
