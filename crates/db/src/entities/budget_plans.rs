//! `SeaORM` Entity for budget_plans table.

use itbudget_core::budget::{BudgetPlan, PlanClassification};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BudgetType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub display_id: String,
    pub budget_type: BudgetType,
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub planned_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub realized_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 0)))")]
    pub remaining_amount: Decimal,
    pub coa: Option<String>,
    pub category: Option<String>,
    pub component: Option<String>,
    pub item_code: Option<String>,
    pub item_description: Option<String>,
    pub capex_number: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_transactions::Entity")]
    BudgetTransactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::budget_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetTransactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BudgetPlan {
    fn from(m: Model) -> Self {
        let classification = match m.budget_type {
            BudgetType::Opex => PlanClassification::Opex {
                coa: m.coa,
                category: m.category,
                component: m.component,
            },
            BudgetType::Capex => PlanClassification::Capex {
                item_code: m.item_code,
                item_description: m.item_description,
                capex_number: m.capex_number,
            },
        };

        Self {
            id: m.id,
            display_id: m.display_id,
            year: m.year,
            planned_amount: m.planned_amount,
            realized_amount: m.realized_amount,
            remaining_amount: m.remaining_amount,
            classification,
            created_by: m.created_by,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}
