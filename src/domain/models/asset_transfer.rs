use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Mint,
    Transfer,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Mint => "mint",
            TransferType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint" => Ok(TransferType::Mint),
            "transfer" => Ok(TransferType::Transfer),
            other => Err(format!("Unknown transfer type: {}", other)),
        }
    }
}

/// Append-only ledger row. `(txid, asset_name, to)` is the replay key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTransfer {
    pub txid: String,
    pub asset_id: String,
    pub asset_name: String,
    /// `None` for mints
    pub from: Option<String>,
    pub to: String,
    pub amount: Decimal,
    pub transfer_type: TransferType,
    pub block_height: u64,
    pub timestamp: i64,
}
