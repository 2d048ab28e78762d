use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Fungibility of an asset, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Unique,
    Fungible,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Unique => "unique",
            AssetKind::Fungible => "fungible",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unique" => Ok(AssetKind::Unique),
            "fungible" => Ok(AssetKind::Fungible),
            other => Err(format!("Unknown asset type: {}", other)),
        }
    }
}

/// Current state of an asset, derived from its creation, mint and transfer history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Creation transaction id
    pub asset_id: String,
    /// Root name, or `PARENT|leaf` for sub-assets
    pub name: String,
    pub asset_type: AssetKind,
    pub creator: String,
    /// Last address an asset output was sent to; not a holder registry
    pub current_owner: String,
    pub mint_count: u64,
    pub max_mint_count: u64,
    pub total_supply: Decimal,
    pub circulating_supply: Decimal,
    pub transfer_count: u64,
    pub decimal_point: u8,
    pub updatable: bool,
    pub is_unique: bool,
    pub reference_hash: Option<String>,
    pub ipfs_verified: bool,
    pub metadata: Option<Value>,
    pub image_url: Option<String>,
    pub is_sub_asset: bool,
    pub parent_asset_id: Option<String>,
    pub parent_asset_name: Option<String>,
    pub sub_asset_name: Option<String>,
    pub block_height: u64,
    /// Creation block time, unix seconds
    pub created_time: i64,
    pub last_mint_time: Option<i64>,
    pub last_transfer_time: Option<i64>,
}

impl Asset {
    /// Whether further mints would exceed the declared mint limit
    pub fn mint_limit_reached(&self) -> bool {
        self.max_mint_count > 0 && self.mint_count >= self.max_mint_count
    }
}
