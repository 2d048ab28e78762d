#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use rtm_asset_indexer::application::sync::{StopSignal, SyncDaemon};
use rtm_asset_indexer::config::SyncConfig;
use rtm_asset_indexer::domain::models::SyncState;
use rtm_asset_indexer::domain::services::MetadataProvider;
use rtm_asset_indexer::infrastructure::persistence::repositories::SyncStateRepository;
use rtm_asset_indexer::infrastructure::persistence::{MemoryStore, Repositories};
use rtm_asset_indexer::infrastructure::rpc::types::{BlockchainInfo, RpcBlock};
use rtm_asset_indexer::infrastructure::rpc::{BlockRef, ChainRpc, RpcError};

pub const STREAM: &str = "test-stream";

/// In-process node serving a fixed set of verbose blocks
#[derive(Default)]
pub struct FakeChain {
    blocks: Mutex<BTreeMap<u64, RpcBlock>>,
    /// Number of upcoming `getblock` calls that fail
    pub failing_block_calls: AtomicU32,
    /// Make every call fail
    pub offline: AtomicBool,
    pub block_calls: AtomicU32,
}

impl FakeChain {
    pub fn new(blocks: Vec<RpcBlock>) -> Arc<Self> {
        let chain = Self::default();
        for block in blocks {
            chain.push(block);
        }
        Arc::new(chain)
    }

    pub fn push(&self, block: RpcBlock) {
        self.blocks.lock().unwrap().insert(block.height, block);
    }

    pub fn tip(&self) -> u64 {
        self.blocks
            .lock()
            .unwrap()
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), RpcError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RpcError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError> {
        self.check_online()?;
        Ok(BlockchainInfo {
            chain: "test".to_string(),
            blocks: self.tip(),
            headers: self.tip(),
            bestblockhash: String::new(),
        })
    }

    async fn get_block_hash(&self, height: u64) -> Result<String, RpcError> {
        self.check_online()?;
        self.blocks
            .lock()
            .unwrap()
            .get(&height)
            .map(|block| block.hash.clone())
            .ok_or(RpcError::Rpc {
                code: -8,
                message: "Block height out of range".to_string(),
            })
    }

    async fn get_block(&self, block: BlockRef<'_>, _verbosity: u8) -> Result<RpcBlock, RpcError> {
        self.check_online()?;
        self.block_calls.fetch_add(1, Ordering::SeqCst);

        let pending = self.failing_block_calls.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_block_calls.store(pending - 1, Ordering::SeqCst);
            return Err(RpcError::Transport("connection reset".to_string()));
        }

        let blocks = self.blocks.lock().unwrap();
        let found = match block {
            BlockRef::Height(height) => blocks.get(&height),
            BlockRef::Hash(hash) => blocks.values().find(|b| b.hash == hash),
        };
        found.cloned().ok_or(RpcError::Rpc {
            code: -5,
            message: "Block not found".to_string(),
        })
    }
}

/// Metadata provider answering from a fixed map and counting lookups
#[derive(Default)]
pub struct FakeMetadata {
    documents: HashMap<String, Value>,
    pub lookups: AtomicU32,
}

impl FakeMetadata {
    pub fn with(hash: &str, document: Value) -> Arc<Self> {
        let mut documents = HashMap::new();
        documents.insert(hash.to_string(), document);
        Arc::new(Self {
            documents,
            lookups: AtomicU32::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn fetch_metadata(&self, hash: &str) -> Option<Value> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.documents.get(hash).cloned()
    }

    fn resolve_image_url(&self, metadata: &Value, field: &str) -> Option<String> {
        metadata
            .get(field)
            .and_then(Value::as_str)
            .map(|cid| format!("https://gateway.test/ipfs/{}", cid.trim_start_matches("ipfs://")))
    }
}

pub fn test_config() -> SyncConfig {
    SyncConfig {
        stream_id: STREAM.to_string(),
        start_height: 99,
        batch_size: 10,
        checkpoint_interval: 2,
        block_retry_attempts: 2,
        block_retry_delay_ms: 1,
        loop_retry_attempts: 1,
        loop_retry_delay_ms: 1,
        heartbeat_interval_ms: 5,
        index_standard_transactions: false,
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub chain: Arc<FakeChain>,
    pub metadata: Arc<FakeMetadata>,
}

impl Harness {
    pub fn new(blocks: Vec<RpcBlock>) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            chain: FakeChain::new(blocks),
            metadata: FakeMetadata::empty(),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories::in_memory(self.store.clone())
    }

    pub fn daemon(&self, config: SyncConfig, stop: StopSignal) -> SyncDaemon {
        SyncDaemon::new(
            self.chain.clone(),
            &self.repositories(),
            self.metadata.clone(),
            config,
            stop,
        )
    }

    pub async fn sync_state(&self) -> SyncState {
        SyncStateRepository::find(self.store.as_ref(), STREAM)
            .await
            .unwrap()
            .expect("sync state should exist")
    }
}

pub fn block(height: u64, time: i64, txs: Vec<Value>) -> RpcBlock {
    serde_json::from_value(json!({
        "hash": format!("hash{}", height),
        "height": height,
        "previousblockhash": format!("hash{}", height.saturating_sub(1)),
        "time": time,
        "size": 250,
        "tx": txs,
    }))
    .unwrap()
}

pub fn coinbase(txid: &str, to: &str) -> Value {
    json!({
        "txid": txid,
        "type": 0,
        "vin": [{"coinbase": "03abcd"}],
        "vout": [{"n": 0, "value": 2500.0, "scriptPubKey": {"type": "pubkeyhash", "addresses": [to]}}]
    })
}

pub fn create_tx(txid: &str, name: &str, owner: &str) -> Value {
    json!({
        "txid": txid,
        "type": 8,
        "vin": [{"txid": "funding", "vout": 0, "address": owner, "value": 200.0}],
        "vout": [{"n": 0, "value": 99.0, "scriptPubKey": {"type": "pubkeyhash", "addresses": [owner]}}],
        "newAssetTx": {
            "name": name,
            "isUnique": false,
            "maxMintCount": 10,
            "updatable": true,
            "referenceHash": "",
            "ownerAddress": owner,
            "isRoot": true,
            "rootId": "",
            "decimalPoint": 0,
            "amount": 100.0
        }
    })
}

pub fn sub_asset_tx(txid: &str, leaf: &str, root_id: &str, owner: &str) -> Value {
    let mut tx = create_tx(txid, leaf, owner);
    tx["newAssetTx"]["isRoot"] = json!(false);
    tx["newAssetTx"]["rootId"] = json!(root_id);
    tx
}

pub fn mint_tx(txid: &str, asset_id: &str, asset_name: &str, to: &str, amount: f64) -> Value {
    json!({
        "txid": txid,
        "type": 10,
        "vin": [{"txid": "funding", "vout": 1, "address": "RFUNDER", "value": 50.0}],
        "vout": [{
            "n": 0,
            "value": 0.0,
            "scriptPubKey": {
                "type": "transferasset",
                "addresses": [to],
                "asset": {"name": asset_name, "asset_id": asset_id, "amount": amount}
            }
        }],
        "mintAssetTx": {"assetId": asset_id, "fee": 0}
    })
}

/// Type-0 transaction moving assets from `from`; outputs are `(to, asset name, amount)`
pub fn transfer_tx(txid: &str, from: &str, outputs: &[(&str, &str, f64)]) -> Value {
    let vout: Vec<Value> = outputs
        .iter()
        .enumerate()
        .map(|(n, (to, name, amount))| {
            json!({
                "n": n,
                "value": 0.0,
                "scriptPubKey": {
                    "type": "transferasset",
                    "addresses": [to],
                    "asset": {"name": name, "amount": amount}
                }
            })
        })
        .collect();

    json!({
        "txid": txid,
        "type": 0,
        "vin": [
            {"txid": "prev", "vout": 0},
            {"txid": "prev", "vout": 1, "address": from, "value": 1.0}
        ],
        "vout": vout
    })
}

pub fn future_tx(txid: &str, maturity: i64, lock_time: i64, to: &str, value: f64) -> Value {
    json!({
        "txid": txid,
        "type": 7,
        "vin": [{"txid": "funding", "vout": 2, "address": "RFUNDER", "value": value + 1.0}],
        "vout": [
            {"n": 0, "value": value, "scriptPubKey": {"type": "pubkeyhash", "addresses": [to]}},
            {"n": 1, "value": 0.9, "scriptPubKey": {"type": "pubkeyhash", "addresses": ["RFUNDER"]}}
        ],
        "futureTx": {
            "maturity": maturity,
            "lockTime": lock_time,
            "lockOutputIndex": 0,
            "updatableByDestination": false
        }
    })
}

/// Empty blocks `from..=to`, one minute apart starting at `time`
pub fn empty_blocks(from: u64, to: u64, time: i64) -> Vec<RpcBlock> {
    (from..=to)
        .map(|height| {
            block(
                height,
                time + (height - from) as i64 * 60,
                vec![coinbase(&format!("cb{}", height), "RMINER")],
            )
        })
        .collect()
}
