//! Raptoreum node access
//!
//! `ChainRpc` is the seam the ingestion loop depends on; `RpcClient` is the
//! HTTP implementation used by the daemon.

pub mod client;
mod error;
pub mod types;

pub use client::RpcClient;
pub use error::RpcError;

use async_trait::async_trait;

use crate::utils::logging;
use types::{BlockchainInfo, RpcBlock};

/// Block selector accepted by `get_block`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef<'a> {
    Hash(&'a str),
    Height(u64),
}

/// Node operations consumed by the sync daemon
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current chain summary, including the tip height
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError>;

    /// Hash of the block at the given height
    async fn get_block_hash(&self, height: u64) -> Result<String, RpcError>;

    /// Block by hash or height at the given verbosity
    async fn get_block(&self, block: BlockRef<'_>, verbosity: u8) -> Result<RpcBlock, RpcError>;

    /// Whether the node answers RPC calls at all
    async fn check_health(&self) -> bool {
        match self.get_blockchain_info().await {
            Ok(_) => true,
            Err(e) => {
                logging::log_warning(&format!("Node health check failed: {}", e));
                false
            }
        }
    }
}
