use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::infrastructure::rpc::types::RpcTransaction;

/// What a stored transaction row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxClassification {
    AssetCreate,
    AssetMint,
    AssetTransfer,
    AssetUpdate,
    FutureLock,
    Standard,
}

impl TxClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxClassification::AssetCreate => "asset_create",
            TxClassification::AssetMint => "asset_mint",
            TxClassification::AssetTransfer => "asset_transfer",
            TxClassification::AssetUpdate => "asset_update",
            TxClassification::FutureLock => "future_lock",
            TxClassification::Standard => "standard",
        }
    }
}

impl fmt::Display for TxClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset_create" => Ok(TxClassification::AssetCreate),
            "asset_mint" => Ok(TxClassification::AssetMint),
            "asset_transfer" => Ok(TxClassification::AssetTransfer),
            "asset_update" => Ok(TxClassification::AssetUpdate),
            "future_lock" => Ok(TxClassification::FutureLock),
            "standard" => Ok(TxClassification::Standard),
            other => Err(format!("Unknown transaction classification: {}", other)),
        }
    }
}

/// Block coordinates shared by every transaction of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub height: u64,
    pub block_hash: String,
    /// Block time, unix seconds
    pub block_time: i64,
}

/// Stored transaction row; written once, at most one block hash backfill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub block_height: u64,
    pub block_hash: Option<String>,
    pub timestamp: i64,
    pub tx_type: i32,
    pub classification: TxClassification,
    pub vin: Value,
    pub vout: Value,
    pub payload: Option<Value>,
}

impl Transaction {
    /// Build the stored row for `tx` as seen in the block described by `ctx`
    pub fn from_rpc(
        tx: &RpcTransaction,
        ctx: &TxContext,
        classification: TxClassification,
        payload: Option<Value>,
    ) -> Self {
        Self {
            txid: tx.txid.clone(),
            block_height: ctx.height,
            block_hash: Some(ctx.block_hash.clone()).filter(|hash| !hash.is_empty()),
            timestamp: ctx.block_time,
            tx_type: tx.tx_type,
            classification,
            vin: serde_json::to_value(&tx.vin).unwrap_or(Value::Array(Vec::new())),
            vout: serde_json::to_value(&tx.vout).unwrap_or(Value::Array(Vec::new())),
            payload,
        }
    }
}
