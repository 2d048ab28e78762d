//! Asset entity for SeaORM

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub asset_id: String,
    pub name: String,
    pub asset_type: String,
    pub creator: String,
    pub current_owner: String,
    pub mint_count: i64,
    pub max_mint_count: i64,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub total_supply: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub circulating_supply: Decimal,
    pub transfer_count: i64,
    pub decimal_point: i32,
    pub updatable: bool,
    pub is_unique: bool,
    pub reference_hash: Option<String>,
    pub ipfs_verified: bool,
    pub metadata: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub is_sub_asset: bool,
    pub parent_asset_id: Option<String>,
    pub parent_asset_name: Option<String>,
    pub sub_asset_name: Option<String>,
    pub block_height: i64,
    pub created_time: i64,
    pub last_mint_time: Option<i64>,
    pub last_transfer_time: Option<i64>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
