//! Dispatch of block transactions to their handlers.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::ProcessingError;
use crate::domain::models::{TxClassification, TxContext};
use crate::domain::services::asset_processor::AssetProcessor;
use crate::domain::services::future_checker::FutureChecker;
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::TransactionRepository;
use crate::infrastructure::rpc::types::{
    FuturePayload, MintAssetPayload, NewAssetPayload, RpcTransaction,
};
use crate::utils::logging;

pub const TX_TYPE_STANDARD: i32 = 0;
pub const TX_TYPE_FUTURE: i32 = 7;
pub const TX_TYPE_NEW_ASSET: i32 = 8;
pub const TX_TYPE_UPDATE_ASSET: i32 = 9;
pub const TX_TYPE_MINT_ASSET: i32 = 10;

/// Handler selected for a transaction, with its typed payload
#[derive(Debug, Clone, Copy)]
pub enum TxKind<'a> {
    Create(&'a NewAssetPayload),
    Mint(&'a MintAssetPayload),
    Update(Option<&'a Value>),
    FutureLock(&'a FuturePayload),
    Transfer,
    Standard,
}

impl<'a> TxKind<'a> {
    /// Classify by the `type` field; special types must carry their payload
    pub fn classify(tx: &'a RpcTransaction) -> Result<Self, ProcessingError> {
        let missing = |object: &str| {
            ProcessingError::data(format!(
                "type {} transaction {} has no {}",
                tx.tx_type, tx.txid, object
            ))
        };

        match tx.tx_type {
            TX_TYPE_NEW_ASSET => tx
                .new_asset
                .as_ref()
                .map(TxKind::Create)
                .ok_or_else(|| missing("newAssetTx")),
            TX_TYPE_MINT_ASSET => tx
                .mint_asset
                .as_ref()
                .map(TxKind::Mint)
                .ok_or_else(|| missing("mintAssetTx")),
            TX_TYPE_UPDATE_ASSET => Ok(TxKind::Update(tx.update_asset.as_ref())),
            TX_TYPE_FUTURE => tx
                .future
                .as_ref()
                .map(TxKind::FutureLock)
                .ok_or_else(|| missing("futureTx")),
            _ if tx.asset_outputs().next().is_some() => Ok(TxKind::Transfer),
            _ => Ok(TxKind::Standard),
        }
    }

    pub fn classification(&self) -> TxClassification {
        match self {
            TxKind::Create(_) => TxClassification::AssetCreate,
            TxKind::Mint(_) => TxClassification::AssetMint,
            TxKind::Update(_) => TxClassification::AssetUpdate,
            TxKind::FutureLock(_) => TxClassification::FutureLock,
            TxKind::Transfer => TxClassification::AssetTransfer,
            TxKind::Standard => TxClassification::Standard,
        }
    }
}

/// Result of routing one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Applied(TxClassification),
    /// Plain transaction with nothing to index
    Ignored,
    /// Data error, logged and skipped
    Rejected(String),
}

pub struct TransactionRouter {
    assets: Arc<AssetProcessor>,
    futures: Arc<FutureChecker>,
    transactions: Arc<dyn TransactionRepository>,
    index_standard: bool,
}

impl TransactionRouter {
    pub fn new(
        assets: Arc<AssetProcessor>,
        futures: Arc<FutureChecker>,
        transactions: Arc<dyn TransactionRepository>,
        index_standard: bool,
    ) -> Self {
        Self {
            assets,
            futures,
            transactions,
            index_standard,
        }
    }

    /// Apply one transaction. Data errors stay inside the transaction; store
    /// errors are returned so the whole block can be retried.
    pub async fn route(&self, tx: &RpcTransaction, ctx: &TxContext) -> Result<RouteOutcome, DbError> {
        match self.dispatch(tx, ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(ProcessingError::DataError(message)) => {
                logging::log_warning(&format!(
                    "Skipping transaction {} at height {}: {}",
                    tx.txid, ctx.height, message
                ));
                Ok(RouteOutcome::Rejected(message))
            }
            Err(ProcessingError::DbError(e)) => Err(e),
        }
    }

    async fn dispatch(
        &self,
        tx: &RpcTransaction,
        ctx: &TxContext,
    ) -> Result<RouteOutcome, ProcessingError> {
        let kind = TxKind::classify(tx)?;
        let classification = kind.classification();

        match kind {
            TxKind::Create(payload) => {
                self.assets.create(tx, payload, ctx).await?;
            }
            TxKind::Mint(payload) => {
                self.assets.mint(tx, payload, ctx).await?;
            }
            TxKind::Update(payload) => {
                self.assets.update(tx, payload, ctx).await?;
            }
            TxKind::FutureLock(payload) => {
                self.futures.create(tx, payload, ctx).await?;
            }
            TxKind::Transfer => {
                self.assets.transfer(tx, ctx).await?;
            }
            TxKind::Standard => {
                if !self.index_standard {
                    return Ok(RouteOutcome::Ignored);
                }
                record_transaction(self.transactions.as_ref(), tx, ctx, classification, None)
                    .await?;
            }
        }

        Ok(RouteOutcome::Applied(classification))
    }
}
