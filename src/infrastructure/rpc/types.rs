//! Wire types for the subset of the Raptoreum RPC surface the daemon consumes.
//!
//! Only `getblock` with verbosity 2 is decoded into these types; unknown fields
//! are ignored so node upgrades adding fields do not break ingestion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of `getblockchaininfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockchainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(default)]
    pub headers: u64,
    #[serde(default)]
    pub bestblockhash: String,
}

/// Block as returned by `getblock <hash> 2`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcBlock {
    pub hash: String,
    pub height: u64,
    #[serde(rename = "previousblockhash", default)]
    pub previous_hash: Option<String>,
    pub time: i64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub tx: Vec<RpcTransaction>,
}

/// Transaction embedded in a verbose block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcTransaction {
    pub txid: String,
    #[serde(rename = "type", default)]
    pub tx_type: i32,
    #[serde(default)]
    pub vin: Vec<RpcVin>,
    #[serde(default)]
    pub vout: Vec<RpcVout>,
    #[serde(rename = "newAssetTx", default, skip_serializing_if = "Option::is_none")]
    pub new_asset: Option<NewAssetPayload>,
    #[serde(rename = "mintAssetTx", default, skip_serializing_if = "Option::is_none")]
    pub mint_asset: Option<MintAssetPayload>,
    #[serde(rename = "updateAssetTx", default, skip_serializing_if = "Option::is_none")]
    pub update_asset: Option<serde_json::Value>,
    #[serde(rename = "futureTx", default, skip_serializing_if = "Option::is_none")]
    pub future: Option<FuturePayload>,
}

impl RpcTransaction {
    /// Outputs whose script carries an asset-transfer marker
    pub fn asset_outputs(&self) -> impl Iterator<Item = &RpcVout> {
        self.vout.iter().filter(|out| out.script_pub_key.asset.is_some())
    }

    /// Address of the first input that carries one
    pub fn first_input_address(&self) -> Option<&str> {
        self.vin.iter().find_map(|input| input.address.as_deref())
    }

    pub fn output(&self, n: u32) -> Option<&RpcVout> {
        self.vout.iter().find(|out| out.n == n)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVout {
    pub n: u32,
    #[serde(default)]
    pub value: Decimal,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

impl RpcVout {
    /// First address the output pays to
    pub fn recipient(&self) -> Option<&str> {
        self.script_pub_key.addresses.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptPubKey {
    #[serde(rename = "type", default)]
    pub script_type: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<ScriptAsset>,
}

/// Asset marker on an output script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
}

/// Payload of an asset creation transaction (type 8)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetPayload {
    pub name: String,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub max_mint_count: u64,
    #[serde(default)]
    pub updatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_hash: Option<String>,
    pub owner_address: String,
    #[serde(default = "default_is_root")]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    #[serde(default)]
    pub decimal_point: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

fn default_is_root() -> bool {
    true
}

/// Payload of an asset mint transaction (type 10)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintAssetPayload {
    pub asset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
}

/// Payload of a future (locked output) transaction (type 7)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturePayload {
    pub maturity: i64,
    pub lock_time: i64,
    pub lock_output_index: u32,
    #[serde(default)]
    pub updatable_by_destination: bool,
}
