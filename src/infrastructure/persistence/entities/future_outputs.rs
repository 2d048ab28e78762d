//! SeaORM Entity for future_outputs table

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "future_outputs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub txid: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub vout: i32,
    pub lock_type: String,
    pub asset_id: Option<String>,
    pub asset_name: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub amount: Decimal,
    pub recipient: Option<String>,
    pub maturity: i64,
    pub lock_time: i64,
    pub unlock_height: Option<i64>,
    pub unlock_time: Option<i64>,
    pub updatable_by_destination: bool,
    pub block_height: i64,
    pub block_time: i64,
    pub status: String,
    pub unlocked_by: Option<String>,
    pub unlocked_at_height: Option<i64>,
    pub unlocked_at_time: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
