//! Asset lifecycle handlers.
//!
//! Each handler is idempotent against replay of the same block: assets are
//! inserted only if absent, ledger rows are keyed by `(txid, asset_name, to)`,
//! and counters move only when a ledger row was actually written.

pub mod asset_ref;
mod create;
mod mint;
mod transfer;
mod update;

pub use asset_ref::{strip_asset_suffix, sub_asset_name, UNKNOWN_PARENT};
pub use transfer::{transferred_total, TransferSummary};

use std::sync::Arc;

use crate::domain::services::metadata_cache::MetadataProvider;
use crate::infrastructure::persistence::repositories::{
    AssetRepository, AssetTransferRepository, TransactionRepository,
};

/// Applies asset transactions to the stored asset state
pub struct AssetProcessor {
    assets: Arc<dyn AssetRepository>,
    transfers: Arc<dyn AssetTransferRepository>,
    transactions: Arc<dyn TransactionRepository>,
    metadata: Arc<dyn MetadataProvider>,
}

impl AssetProcessor {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        transfers: Arc<dyn AssetTransferRepository>,
        transactions: Arc<dyn TransactionRepository>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            assets,
            transfers,
            transactions,
            metadata,
        }
    }
}
