use serde::{Deserialize, Serialize};

use crate::infrastructure::rpc::types::RpcBlock;

/// Stored block header; written once per height
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub hash: String,
    pub previous_hash: Option<String>,
    /// Unix seconds
    pub timestamp: i64,
    pub txids: Vec<String>,
    pub size: u64,
}

impl From<&RpcBlock> for Block {
    fn from(block: &RpcBlock) -> Self {
        Self {
            height: block.height,
            hash: block.hash.clone(),
            previous_hash: block.previous_hash.clone(),
            timestamp: block.time,
            txids: block.tx.iter().map(|tx| tx.txid.clone()).collect(),
            size: block.size,
        }
    }
}
