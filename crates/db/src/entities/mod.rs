//! `SeaORM` entity definitions.

pub mod budget_plans;
pub mod budget_transactions;
pub mod display_id_counters;
pub mod sea_orm_active_enums;
pub mod users;
