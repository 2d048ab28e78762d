//! SeaORM Entity for asset_transfers table
//! Append-only; unique on (txid, asset_name, to_address)

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub txid: String,
    pub asset_id: String,
    pub asset_name: String,
    pub from_address: Option<String>,
    pub to_address: String,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub amount: Decimal,
    pub transfer_type: String,
    pub block_height: i64,
    pub timestamp: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
