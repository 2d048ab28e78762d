//! Repository seams for every persisted collection.
//!
//! Services depend on the traits only; `SeaOrm*` types back them with
//! Postgres and `MemoryStore` backs them in-process.

pub mod asset_repository;
pub mod asset_transfer_repository;
pub mod block_repository;
pub mod future_output_repository;
pub mod ipfs_cache_repository;
pub mod sync_state_repository;
pub mod transaction_repository;

pub use asset_repository::SeaOrmAssetRepository;
pub use asset_transfer_repository::SeaOrmAssetTransferRepository;
pub use block_repository::SeaOrmBlockRepository;
pub use future_output_repository::SeaOrmFutureOutputRepository;
pub use ipfs_cache_repository::SeaOrmIpfsCacheRepository;
pub use sync_state_repository::SeaOrmSyncStateRepository;
pub use transaction_repository::SeaOrmTransactionRepository;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::models::{
    Asset, AssetTransfer, Block, FutureOutput, IpfsCacheEntry, SyncState, Transaction,
    UnlockTrigger,
};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::memory::MemoryStore;

#[async_trait]
pub trait SyncStateRepository: Send + Sync {
    async fn find(&self, stream_id: &str) -> Result<Option<SyncState>, DbError>;

    /// Insert or overwrite the stream's row
    async fn save(&self, state: &SyncState) -> Result<(), DbError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn find_by_height(&self, height: u64) -> Result<Option<Block>, DbError>;

    /// Insert a block; returns false when the height was already stored
    async fn insert(&self, block: &Block) -> Result<bool, DbError>;

    /// Remove every block above `height`, returning how many were removed
    async fn delete_above(&self, height: u64) -> Result<u64, DbError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_txid(&self, txid: &str) -> Result<Option<Transaction>, DbError>;

    /// Insert a transaction; returns false when the txid was already stored
    async fn insert(&self, transaction: &Transaction) -> Result<bool, DbError>;

    /// Fill in a block hash that was missing on first write
    async fn set_block_hash(&self, txid: &str, block_hash: &str) -> Result<(), DbError>;

    async fn delete_above(&self, height: u64) -> Result<u64, DbError>;
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn find_by_id(&self, asset_id: &str) -> Result<Option<Asset>, DbError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, DbError>;

    /// Insert a new asset; an existing asset id is left untouched
    async fn insert(&self, asset: &Asset) -> Result<bool, DbError>;

    async fn update(&self, asset: &Asset) -> Result<(), DbError>;
}

#[async_trait]
pub trait AssetTransferRepository: Send + Sync {
    /// Write keyed by `(txid, asset_name, to)`. Existing rows are kept as they
    /// are; returns true only when a new row was written.
    async fn upsert(&self, transfer: &AssetTransfer) -> Result<bool, DbError>;

    async fn find_by_asset(&self, asset_id: &str) -> Result<Vec<AssetTransfer>, DbError>;
}

#[async_trait]
pub trait FutureOutputRepository: Send + Sync {
    async fn find(&self, txid: &str, vout: u32) -> Result<Option<FutureOutput>, DbError>;

    /// Insert a locked output; returns false when `(txid, vout)` already exists
    async fn insert(&self, future: &FutureOutput) -> Result<bool, DbError>;

    /// Locked rows whose height or time condition holds
    async fn find_matured(&self, height: u64, time: i64) -> Result<Vec<FutureOutput>, DbError>;

    /// Flip a locked row to unlocked; returns false if it was not locked
    async fn mark_unlocked(
        &self,
        txid: &str,
        vout: u32,
        trigger: UnlockTrigger,
        height: u64,
        time: i64,
    ) -> Result<bool, DbError>;
}

#[async_trait]
pub trait IpfsCacheRepository: Send + Sync {
    async fn get(&self, hash: &str) -> Result<Option<IpfsCacheEntry>, DbError>;

    /// Insert or replace the entry for its hash
    async fn put(&self, entry: &IpfsCacheEntry) -> Result<(), DbError>;

    /// Bump the access counter of a cached hash
    async fn record_access(&self, hash: &str) -> Result<(), DbError>;
}

/// Collection of all repositories
#[derive(Clone)]
pub struct Repositories {
    pub sync_state: Arc<dyn SyncStateRepository>,
    pub block: Arc<dyn BlockRepository>,
    pub transaction: Arc<dyn TransactionRepository>,
    pub asset: Arc<dyn AssetRepository>,
    pub asset_transfer: Arc<dyn AssetTransferRepository>,
    pub future_output: Arc<dyn FutureOutputRepository>,
    pub ipfs_cache: Arc<dyn IpfsCacheRepository>,
}

impl Repositories {
    /// Every repository backed by one shared in-process store
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            sync_state: store.clone(),
            block: store.clone(),
            transaction: store.clone(),
            asset: store.clone(),
            asset_transfer: store.clone(),
            future_output: store.clone(),
            ipfs_cache: store,
        }
    }
}
