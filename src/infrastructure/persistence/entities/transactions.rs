//! SeaORM Entity for transactions table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub txid: String,
    pub block_height: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub block_hash: Option<String>,
    pub timestamp: i64,
    pub tx_type: i32,
    #[sea_orm(column_type = "Text")]
    pub classification: String,
    pub vin: Json,
    pub vout: Json,
    pub payload: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
