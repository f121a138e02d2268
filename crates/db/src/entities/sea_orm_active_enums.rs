//! `SeaORM` active enums mapped to Postgres enum types.

use itbudget_core::budget::{BudgetType as CoreBudgetType, TransactionStatus as CoreStatus};
use itbudget_shared::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "budget_type")]
pub enum BudgetType {
    #[sea_orm(string_value = "opex")]
    Opex,
    #[sea_orm(string_value = "capex")]
    Capex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "budget_transaction_status"
)]
pub enum TransactionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

impl From<CoreBudgetType> for BudgetType {
    fn from(value: CoreBudgetType) -> Self {
        match value {
            CoreBudgetType::Opex => Self::Opex,
            CoreBudgetType::Capex => Self::Capex,
        }
    }
}

impl From<BudgetType> for CoreBudgetType {
    fn from(value: BudgetType) -> Self {
        match value {
            BudgetType::Opex => Self::Opex,
            BudgetType::Capex => Self::Capex,
        }
    }
}

impl From<CoreStatus> for TransactionStatus {
    fn from(value: CoreStatus) -> Self {
        match value {
            CoreStatus::Draft => Self::Draft,
            CoreStatus::Submitted => Self::Submitted,
            CoreStatus::Approved => Self::Approved,
            CoreStatus::Paid => Self::Paid,
            CoreStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TransactionStatus> for CoreStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Draft => Self::Draft,
            TransactionStatus::Submitted => Self::Submitted,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Paid => Self::Paid,
            TransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Role> for UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

impl From<UserRole> for Role {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}
