//! `SeaORM` Entity for budget_transactions table.

use itbudget_core::budget::BudgetTransaction;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{BudgetType, TransactionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub display_id: String,
    pub budget_plan_id: Uuid,
    pub budget_type: BudgetType,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub description: String,
    pub vendor: Option<String>,
    pub transaction_date: Date,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget_plans::Entity",
        from = "Column::BudgetPlanId",
        to = "super::budget_plans::Column::Id",
        on_delete = "Cascade"
    )]
    BudgetPlans,
}

impl Related<super::budget_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BudgetTransaction {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            display_id: m.display_id,
            budget_plan_id: m.budget_plan_id,
            budget_type: m.budget_type.into(),
            amount: m.amount,
            status: m.status.into(),
            description: m.description,
            vendor: m.vendor,
            transaction_date: m.transaction_date,
            created_by: m.created_by,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}
