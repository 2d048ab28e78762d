//! The ingestion loop: reads the node tip, processes blocks in order,
//! checkpoints progress and drives the sync status machine.

mod block_ingestor;
mod block_time;
mod retry_handler;
mod shutdown;

pub use block_ingestor::{BlockIngestor, IngestedBlock};
pub use block_time::BlockTimeTracker;
pub use retry_handler::RetryHandler;
pub use shutdown::{stop_channel, StopHandle, StopSignal};

use chrono::Utc;
use std::sync::Arc;
use tokio::time::Duration;

use crate::config::SyncConfig;
use crate::domain::errors::SyncError;
use crate::domain::models::{Block, SyncState, SyncStateUpdate, SyncStatus};
use crate::domain::services::{
    AssetProcessor, FutureChecker, MetadataProvider, SyncStateStore, TransactionRouter,
};
use crate::infrastructure::persistence::Repositories;
use crate::infrastructure::rpc::ChainRpc;
use crate::utils::logging;

/// How one loop iteration ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Store is at the node tip
    CaughtUp { height: u64 },
    /// Heights `from..=to` are committed
    Progressed { from: u64, to: u64 },
    /// Stop requested; committed up to `height`
    Stopped { height: u64 },
}

pub struct SyncDaemon {
    rpc: Arc<dyn ChainRpc>,
    ingestor: BlockIngestor,
    futures: Arc<FutureChecker>,
    state: SyncStateStore,
    config: SyncConfig,
    block_times: BlockTimeTracker,
    stop: StopSignal,
}

impl SyncDaemon {
    pub fn new(
        rpc: Arc<dyn ChainRpc>,
        repositories: &Repositories,
        metadata: Arc<dyn MetadataProvider>,
        config: SyncConfig,
        stop: StopSignal,
    ) -> Self {
        let assets = Arc::new(AssetProcessor::new(
            repositories.asset.clone(),
            repositories.asset_transfer.clone(),
            repositories.transaction.clone(),
            metadata,
        ));
        let futures = Arc::new(FutureChecker::new(
            repositories.future_output.clone(),
            repositories.block.clone(),
            repositories.transaction.clone(),
        ));
        let router = Arc::new(TransactionRouter::new(
            assets,
            futures.clone(),
            repositories.transaction.clone(),
            config.index_standard_transactions,
        ));
        let ingestor = BlockIngestor::new(
            rpc.clone(),
            repositories.block.clone(),
            router,
            RetryHandler::with_config(config.block_retry_attempts, config.block_retry_delay_ms),
            config.stream_id.clone(),
        );
        let state = SyncStateStore::new(
            repositories.sync_state.clone(),
            config.stream_id.clone(),
            config.start_height,
        );

        Self {
            rpc,
            ingestor,
            futures,
            state,
            config,
            block_times: BlockTimeTracker::new(),
            stop,
        }
    }

    fn stream(&self) -> &str {
        &self.config.stream_id
    }

    /// Run until stopped or until the loop retry budget is exhausted.
    ///
    /// Returns the final persisted state on a clean stop; on fail-stop the
    /// state is left at `error` and the last failure is returned.
    pub async fn run(&mut self) -> Result<SyncState, SyncError> {
        let initial = self.state.load().await?;
        logging::log_info(&format!(
            "[{}] 🚀 Starting sync from height {} (status {})",
            self.stream(),
            initial.current_block,
            initial.status
        ));

        let heartbeat = Duration::from_millis(self.config.heartbeat_interval_ms);
        let loop_delay = Duration::from_millis(self.config.loop_retry_delay_ms);
        let mut consecutive_failures: u32 = 0;

        loop {
            if self.stop.is_stopped() {
                return self.pause().await;
            }

            match self.run_iteration().await {
                Ok(IterationOutcome::Stopped { .. }) => return self.pause().await,
                Ok(IterationOutcome::CaughtUp { .. }) => {
                    consecutive_failures = 0;
                    if self.stop.sleep(heartbeat).await {
                        return self.pause().await;
                    }
                }
                Ok(IterationOutcome::Progressed { .. }) => {
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    let message = e.to_string();
                    self.state.record_error(&message).await;

                    if consecutive_failures > self.config.loop_retry_attempts {
                        logging::log_error(&format!(
                            "[{}] 🛑 Halting after {} consecutive failed iterations: {}",
                            self.stream(),
                            consecutive_failures,
                            message
                        ));
                        return Err(e);
                    }

                    logging::log_error(&format!(
                        "[{}] ❌ Sync iteration failed ({}/{}): {}. Retrying in {}ms",
                        self.stream(),
                        consecutive_failures,
                        self.config.loop_retry_attempts,
                        message,
                        self.config.loop_retry_delay_ms
                    ));
                    if self.stop.sleep(loop_delay).await {
                        return self.pause().await;
                    }
                }
            }
        }
    }

    /// Process at most one batch
    pub async fn run_iteration(&mut self) -> Result<IterationOutcome, SyncError> {
        let current = match self.state.current() {
            Some(state) => state.current_block,
            None => self.state.load().await?.current_block,
        };

        let target = self.rpc.get_blockchain_info().await?.blocks;
        if current >= target {
            self.mark_synced(target).await?;
            return Ok(IterationOutcome::CaughtUp { height: current });
        }

        let batch_end = (current + self.config.batch_size.max(1)).min(target);
        self.state
            .update(
                SyncStateUpdate::status(SyncStatus::Syncing)
                    .with_target_block(target)
                    .clear_error(),
            )
            .await?;
        logging::log_info(&format!(
            "[{}] 🔄 Processing blocks {}..={} (tip {})",
            self.stream(),
            current + 1,
            batch_end,
            target
        ));

        let mut last_block: Option<Block> = None;
        let mut since_checkpoint = 0;
        let mut stopped = false;
        let (mut indexed, mut skipped, mut replayed) = (0, 0, 0);

        for height in current + 1..=batch_end {
            if self.stop.is_stopped() {
                stopped = true;
                break;
            }

            let ingested = match self.ingestor.ingest(height).await {
                Ok(ingested) => ingested,
                Err(e) => {
                    if let Some(block) = &last_block {
                        let committed = block.height;
                        if let Err(checkpoint_error) = self.checkpoint(committed, target).await {
                            logging::log_error(&format!(
                                "[{}] Could not checkpoint height {}: {}",
                                self.stream(),
                                committed,
                                checkpoint_error
                            ));
                        }
                    }
                    return Err(e);
                }
            };

            indexed += ingested.applied;
            skipped += ingested.rejected;
            if ingested.already_stored {
                replayed += 1;
            }
            self.block_times.record(ingested.block.timestamp);
            last_block = Some(ingested.block);
            since_checkpoint += 1;

            if since_checkpoint >= self.config.checkpoint_interval {
                self.checkpoint(height, target).await?;
                since_checkpoint = 0;
            }
        }

        let Some(last) = last_block else {
            return Ok(IterationOutcome::Stopped { height: current });
        };

        self.checkpoint(last.height, target).await?;
        self.futures
            .scan_maturity(last.height, last.timestamp)
            .await?;
        logging::log_info(&format!(
            "[{}] Committed blocks {}..={}: {} transaction(s) indexed, {} skipped, {} block(s) already stored",
            self.stream(),
            current + 1,
            last.height,
            indexed,
            skipped,
            replayed
        ));

        if stopped {
            Ok(IterationOutcome::Stopped { height: last.height })
        } else {
            Ok(IterationOutcome::Progressed {
                from: current + 1,
                to: last.height,
            })
        }
    }

    /// Persist progress up to `height`
    async fn checkpoint(&mut self, height: u64, target: u64) -> Result<(), SyncError> {
        let state = self
            .state
            .update(
                SyncStateUpdate::default()
                    .with_current_block(height)
                    .with_target_block(target)
                    .with_last_synced_at(Utc::now())
                    .with_average_block_time(self.block_times.average()),
            )
            .await?;

        logging::log_debug(&format!(
            "[{}] 💾 Checkpoint at height {} of {}",
            self.stream(),
            state.current_block,
            state.target_block
        ));
        Ok(())
    }

    /// Write `synced` once per catch-up; heartbeats at the same tip write nothing
    async fn mark_synced(&mut self, target: u64) -> Result<(), SyncError> {
        let status = match self.state.current() {
            Some(state) if state.status == SyncStatus::Synced && state.target_block == target => {
                return Ok(())
            }
            Some(state) => state.status,
            None => self.state.load().await?.status,
        };

        if !status.can_transition_to(SyncStatus::Synced) {
            self.state.set_status(SyncStatus::Syncing).await?;
        }

        self.state
            .update(
                SyncStateUpdate::status(SyncStatus::Synced)
                    .with_target_block(target)
                    .with_last_synced_at(Utc::now())
                    .clear_error(),
            )
            .await?;

        if status != SyncStatus::Synced {
            logging::log_info(&format!(
                "[{}] ✅ Caught up with node tip {}",
                self.stream(),
                target
            ));
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<SyncState, SyncError> {
        logging::log_info(&format!("[{}] ⏸️  Stop requested, pausing", self.stream()));
        self.state.set_status(SyncStatus::Paused).await
    }

    /// Last persisted state
    pub fn state(&self) -> Option<&SyncState> {
        self.state.current()
    }
}
