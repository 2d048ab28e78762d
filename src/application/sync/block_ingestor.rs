//! Fetches one block from the node and applies it to the store

use std::sync::Arc;

use crate::domain::errors::SyncError;
use crate::domain::models::{Block, TxContext};
use crate::domain::services::{RouteOutcome, TransactionRouter};
use crate::infrastructure::persistence::repositories::BlockRepository;
use crate::infrastructure::rpc::{BlockRef, ChainRpc, RpcError};
use crate::utils::logging;

use super::retry_handler::RetryHandler;

/// Verbosity at which `getblock` embeds decoded transactions
const FULL_VERBOSITY: u8 = 2;

/// Result of ingesting a single height
#[derive(Debug, Clone)]
pub struct IngestedBlock {
    pub block: Block,
    /// Block was already stored and nothing was replayed
    pub already_stored: bool,
    pub applied: usize,
    pub rejected: usize,
}

pub struct BlockIngestor {
    rpc: Arc<dyn ChainRpc>,
    blocks: Arc<dyn BlockRepository>,
    router: Arc<TransactionRouter>,
    retry_handler: RetryHandler,
    stream_id: String,
}

impl BlockIngestor {
    pub fn new(
        rpc: Arc<dyn ChainRpc>,
        blocks: Arc<dyn BlockRepository>,
        router: Arc<TransactionRouter>,
        retry_handler: RetryHandler,
        stream_id: impl Into<String>,
    ) -> Self {
        Self {
            rpc,
            blocks,
            router,
            retry_handler,
            stream_id: stream_id.into(),
        }
    }

    /// Ingest `height`, retrying the whole block on failure
    pub async fn ingest(&self, height: u64) -> Result<IngestedBlock, SyncError> {
        let operation_name = format!("Block {}", height);
        self.retry_handler
            .execute_with_retry_and_logging(
                || self.ingest_once(height),
                &operation_name,
                &self.stream_id,
            )
            .await
    }

    /// One attempt. The block row is written after its transactions, so a
    /// stored block always means a fully applied one.
    async fn ingest_once(&self, height: u64) -> Result<IngestedBlock, SyncError> {
        if let Some(block) = self.blocks.find_by_height(height).await? {
            logging::log_debug(&format!(
                "[{}] Block {} already stored, skipping",
                self.stream_id, height
            ));
            return Ok(IngestedBlock {
                block,
                already_stored: true,
                applied: 0,
                rejected: 0,
            });
        }

        let hash = self.rpc.get_block_hash(height).await?;
        let rpc_block = self
            .rpc
            .get_block(BlockRef::Hash(&hash), FULL_VERBOSITY)
            .await?;
        if rpc_block.height != height {
            return Err(SyncError::RpcError(RpcError::Parse(format!(
                "asked for block {} but node returned {}",
                height, rpc_block.height
            ))));
        }

        let ctx = TxContext {
            height,
            block_hash: rpc_block.hash.clone(),
            block_time: rpc_block.time,
        };

        let mut applied = 0;
        let mut rejected = 0;
        for tx in &rpc_block.tx {
            match self.router.route(tx, &ctx).await? {
                RouteOutcome::Applied(_) => applied += 1,
                RouteOutcome::Rejected(_) => rejected += 1,
                RouteOutcome::Ignored => {}
            }
        }

        let block = Block::from(&rpc_block);
        self.blocks.insert(&block).await?;

        if applied > 0 || rejected > 0 {
            logging::log_info(&format!(
                "[{}] 📦 Block {}: {} transaction(s), {} indexed, {} skipped",
                self.stream_id,
                height,
                block.txids.len(),
                applied,
                rejected
            ));
        }

        Ok(IngestedBlock {
            block,
            already_stored: false,
            applied,
            rejected,
        })
    }
}
