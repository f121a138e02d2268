//! `SeaORM` Entity for display_id_counters table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "display_id_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sequence: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year_prefix: String,
    pub last_value: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
