//! In-process store implementing every repository trait.
//!
//! Used by tests and dry runs; semantics mirror the Postgres repositories,
//! including the insert-or-skip contracts.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::models::{
    Asset, AssetTransfer, Block, FutureOutput, FutureStatus, IpfsCacheEntry, SyncState,
    Transaction, UnlockTrigger,
};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::{
    AssetRepository, AssetTransferRepository, BlockRepository, FutureOutputRepository,
    IpfsCacheRepository, SyncStateRepository, TransactionRepository,
};

#[derive(Debug, Default)]
struct Tables {
    sync_state: HashMap<String, SyncState>,
    blocks: BTreeMap<u64, Block>,
    transactions: HashMap<String, Transaction>,
    assets: HashMap<String, Asset>,
    transfers: Vec<AssetTransfer>,
    futures: BTreeMap<(String, u32), FutureOutput>,
    ipfs_cache: HashMap<String, IpfsCacheEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DbError> {
        self.tables
            .read()
            .map_err(|e| DbError::LockPoisoned(format!("memory store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DbError> {
        self.tables
            .write()
            .map_err(|e| DbError::LockPoisoned(format!("memory store lock poisoned: {}", e)))
    }

    /// Snapshot of every stored asset, ordered by creation height
    pub fn assets(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = match self.read() {
            Ok(tables) => tables.assets.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        assets.sort_by(|a, b| {
            a.block_height
                .cmp(&b.block_height)
                .then_with(|| a.asset_id.cmp(&b.asset_id))
        });
        assets
    }

    /// Snapshot of the whole transfer ledger in insertion order
    pub fn transfers(&self) -> Vec<AssetTransfer> {
        self.read()
            .map(|tables| tables.transfers.clone())
            .unwrap_or_default()
    }

    pub fn block_count(&self) -> usize {
        self.read().map(|tables| tables.blocks.len()).unwrap_or(0)
    }

    pub fn transaction_count(&self) -> usize {
        self.read()
            .map(|tables| tables.transactions.len())
            .unwrap_or(0)
    }

    pub fn futures(&self) -> Vec<FutureOutput> {
        self.read()
            .map(|tables| tables.futures.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SyncStateRepository for MemoryStore {
    async fn find(&self, stream_id: &str) -> Result<Option<SyncState>, DbError> {
        Ok(self.read()?.sync_state.get(stream_id).cloned())
    }

    async fn save(&self, state: &SyncState) -> Result<(), DbError> {
        self.write()?
            .sync_state
            .insert(state.stream_id.clone(), state.clone());
        Ok(())
    }
}

#[async_trait]
impl BlockRepository for MemoryStore {
    async fn find_by_height(&self, height: u64) -> Result<Option<Block>, DbError> {
        Ok(self.read()?.blocks.get(&height).cloned())
    }

    async fn insert(&self, block: &Block) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        if tables.blocks.contains_key(&block.height) {
            return Ok(false);
        }
        tables.blocks.insert(block.height, block.clone());
        Ok(true)
    }

    async fn delete_above(&self, height: u64) -> Result<u64, DbError> {
        let mut tables = self.write()?;
        let removed = tables.blocks.split_off(&(height + 1));
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn find_by_txid(&self, txid: &str) -> Result<Option<Transaction>, DbError> {
        Ok(self.read()?.transactions.get(txid).cloned())
    }

    async fn insert(&self, transaction: &Transaction) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        if tables.transactions.contains_key(&transaction.txid) {
            return Ok(false);
        }
        tables
            .transactions
            .insert(transaction.txid.clone(), transaction.clone());
        Ok(true)
    }

    async fn set_block_hash(&self, txid: &str, block_hash: &str) -> Result<(), DbError> {
        if let Some(tx) = self.write()?.transactions.get_mut(txid) {
            if tx.block_hash.is_none() {
                tx.block_hash = Some(block_hash.to_string());
            }
        }
        Ok(())
    }

    async fn delete_above(&self, height: u64) -> Result<u64, DbError> {
        let mut tables = self.write()?;
        let before = tables.transactions.len();
        tables.transactions.retain(|_, tx| tx.block_height <= height);
        Ok((before - tables.transactions.len()) as u64)
    }
}

#[async_trait]
impl AssetRepository for MemoryStore {
    async fn find_by_id(&self, asset_id: &str) -> Result<Option<Asset>, DbError> {
        Ok(self.read()?.assets.get(asset_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, DbError> {
        Ok(self
            .read()?
            .assets
            .values()
            .filter(|asset| asset.name == name)
            .min_by_key(|asset| asset.block_height)
            .cloned())
    }

    async fn insert(&self, asset: &Asset) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        if tables.assets.contains_key(&asset.asset_id) {
            return Ok(false);
        }
        tables.assets.insert(asset.asset_id.clone(), asset.clone());
        Ok(true)
    }

    async fn update(&self, asset: &Asset) -> Result<(), DbError> {
        let mut tables = self.write()?;
        match tables.assets.get_mut(&asset.asset_id) {
            Some(stored) => {
                let block_height = stored.block_height;
                let created_time = stored.created_time;
                let creator = stored.creator.clone();
                *stored = asset.clone();
                stored.block_height = block_height;
                stored.created_time = created_time;
                stored.creator = creator;
                Ok(())
            }
            None => Err(DbError::MissingRow(format!(
                "asset {} does not exist",
                asset.asset_id
            ))),
        }
    }
}

#[async_trait]
impl AssetTransferRepository for MemoryStore {
    async fn upsert(&self, transfer: &AssetTransfer) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        let exists = tables.transfers.iter().any(|t| {
            t.txid == transfer.txid && t.asset_name == transfer.asset_name && t.to == transfer.to
        });
        if exists {
            return Ok(false);
        }
        tables.transfers.push(transfer.clone());
        Ok(true)
    }

    async fn find_by_asset(&self, asset_id: &str) -> Result<Vec<AssetTransfer>, DbError> {
        let mut rows: Vec<AssetTransfer> = self
            .read()?
            .transfers
            .iter()
            .filter(|t| t.asset_id == asset_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.block_height);
        Ok(rows)
    }
}

#[async_trait]
impl FutureOutputRepository for MemoryStore {
    async fn find(&self, txid: &str, vout: u32) -> Result<Option<FutureOutput>, DbError> {
        Ok(self
            .read()?
            .futures
            .get(&(txid.to_string(), vout))
            .cloned())
    }

    async fn insert(&self, future: &FutureOutput) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        let key = (future.txid.clone(), future.vout);
        if tables.futures.contains_key(&key) {
            return Ok(false);
        }
        tables.futures.insert(key, future.clone());
        Ok(true)
    }

    async fn find_matured(&self, height: u64, time: i64) -> Result<Vec<FutureOutput>, DbError> {
        let mut rows: Vec<FutureOutput> = self
            .read()?
            .futures
            .values()
            .filter(|f| f.is_mature(height, time))
            .cloned()
            .collect();
        rows.sort_by_key(|f| f.block_height);
        Ok(rows)
    }

    async fn mark_unlocked(
        &self,
        txid: &str,
        vout: u32,
        trigger: UnlockTrigger,
        height: u64,
        time: i64,
    ) -> Result<bool, DbError> {
        let mut tables = self.write()?;
        match tables.futures.get_mut(&(txid.to_string(), vout)) {
            Some(future) if future.status == FutureStatus::Locked => {
                future.status = FutureStatus::Unlocked;
                future.unlocked_by = Some(trigger);
                future.unlocked_at_height = Some(height);
                future.unlocked_at_time = Some(time);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl IpfsCacheRepository for MemoryStore {
    async fn get(&self, hash: &str) -> Result<Option<IpfsCacheEntry>, DbError> {
        Ok(self.read()?.ipfs_cache.get(hash).cloned())
    }

    async fn put(&self, entry: &IpfsCacheEntry) -> Result<(), DbError> {
        self.write()?
            .ipfs_cache
            .insert(entry.hash.clone(), entry.clone());
        Ok(())
    }

    async fn record_access(&self, hash: &str) -> Result<(), DbError> {
        if let Some(entry) = self.write()?.ipfs_cache.get_mut(hash) {
            entry.access_count += 1;
            entry.last_accessed_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(height: u64) -> Block {
        Block {
            height,
            hash: format!("hash{}", height),
            previous_hash: None,
            timestamp: 1_000 + height as i64,
            txids: vec![],
            size: 0,
        }
    }

    #[tokio::test]
    async fn test_block_insert_is_idempotent() {
        let store = MemoryStore::new();
        assert!(BlockRepository::insert(&store, &block(1)).await.unwrap());
        assert!(!BlockRepository::insert(&store, &block(1)).await.unwrap());
        assert_eq!(store.block_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_above_keeps_boundary() {
        let store = MemoryStore::new();
        for h in 1..=5 {
            BlockRepository::insert(&store, &block(h)).await.unwrap();
        }
        let removed = BlockRepository::delete_above(&store, 3).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.find_by_height(3).await.unwrap().is_some());
        assert!(store.find_by_height(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_access_bumps_counter() {
        let store = MemoryStore::new();
        store
            .put(&IpfsCacheEntry::success("Qm1", serde_json::json!({})))
            .await
            .unwrap();
        store.record_access("Qm1").await.unwrap();
        let entry = store.get("Qm1").await.unwrap().unwrap();
        assert_eq!(entry.access_count, 2);
    }

    #[tokio::test]
    async fn test_update_of_unknown_asset_is_missing_row() {
        let store = MemoryStore::new();
        let asset = Asset {
            asset_id: "ghost".to_string(),
            name: "GHOST".to_string(),
            asset_type: crate::domain::models::AssetKind::Fungible,
            creator: "RA".to_string(),
            current_owner: "RA".to_string(),
            mint_count: 0,
            max_mint_count: 1,
            total_supply: rust_decimal::Decimal::ZERO,
            circulating_supply: rust_decimal::Decimal::ZERO,
            transfer_count: 0,
            decimal_point: 0,
            updatable: false,
            is_unique: false,
            reference_hash: None,
            ipfs_verified: false,
            metadata: None,
            image_url: None,
            is_sub_asset: false,
            parent_asset_id: None,
            parent_asset_name: None,
            sub_asset_name: None,
            block_height: 1,
            created_time: 0,
            last_mint_time: None,
            last_transfer_time: None,
        };

        let err = AssetRepository::update(&store, &asset).await.unwrap_err();
        assert!(matches!(err, DbError::MissingRow(_)));
        assert!(err.to_string().contains("ghost"));
    }
}
