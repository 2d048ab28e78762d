use rust_decimal::Decimal;

use super::asset_ref::{marker_label, matches_marker, strip_asset_suffix};
use super::AssetProcessor;
use crate::domain::errors::ProcessingError;
use crate::domain::models::{Asset, AssetTransfer, TransferType, TxClassification, TxContext};
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::rpc::types::{RpcTransaction, ScriptAsset};
use crate::utils::logging;

/// What a transfer transaction changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferSummary {
    /// Ledger rows written by this call; zero on replay
    pub transfers_written: usize,
    /// Assets whose counters moved
    pub assets_updated: usize,
}

/// Per-asset accumulation across the outputs of one transaction
struct Touched {
    asset: Asset,
    written: bool,
    last_recipient: String,
    last_foreign_recipient: Option<String>,
}

impl AssetProcessor {
    /// Record every asset-bearing output of a transaction as a transfer
    pub async fn transfer(
        &self,
        tx: &RpcTransaction,
        ctx: &TxContext,
    ) -> Result<TransferSummary, ProcessingError> {
        // Heuristic: the first input carrying an address is taken as the sender
        let sender = tx.first_input_address().map(str::to_string);
        let mut touched: Vec<Touched> = Vec::new();
        let mut summary = TransferSummary::default();

        for output in tx.asset_outputs() {
            let Some(marker) = output.script_pub_key.asset.as_ref() else {
                continue;
            };
            let Some(recipient) = output.recipient() else {
                logging::log_debug(&format!(
                    "Asset output {}:{} has no address, skipping",
                    tx.txid, output.n
                ));
                continue;
            };

            let position = match touched.iter().position(|t| matches_marker(&t.asset, marker)) {
                Some(position) => position,
                None => match self.resolve_marker(marker).await? {
                    Some(asset) => {
                        touched.push(Touched {
                            asset,
                            written: false,
                            last_recipient: String::new(),
                            last_foreign_recipient: None,
                        });
                        touched.len() - 1
                    }
                    None => {
                        logging::log_warning(&format!(
                            "Transfer {}:{} references unknown asset {}",
                            tx.txid,
                            output.n,
                            marker_label(marker)
                        ));
                        continue;
                    }
                },
            };

            let entry = &mut touched[position];
            let transfer = AssetTransfer {
                txid: tx.txid.clone(),
                asset_id: entry.asset.asset_id.clone(),
                asset_name: entry.asset.name.clone(),
                from: sender.clone(),
                to: recipient.to_string(),
                amount: marker.amount,
                transfer_type: TransferType::Transfer,
                block_height: ctx.height,
                timestamp: ctx.block_time,
            };

            if self.transfers.upsert(&transfer).await? {
                entry.written = true;
                summary.transfers_written += 1;
            }

            entry.last_recipient = recipient.to_string();
            if sender.as_deref() != Some(recipient) {
                entry.last_foreign_recipient = Some(recipient.to_string());
            }
        }

        if touched.is_empty() {
            return Err(ProcessingError::data(format!(
                "transfer {} carries no known asset",
                tx.txid
            )));
        }

        for entry in touched.into_iter().filter(|t| t.written) {
            let mut asset = entry.asset;
            asset.current_owner = entry
                .last_foreign_recipient
                .unwrap_or(entry.last_recipient);
            asset.transfer_count += 1;
            asset.last_transfer_time = Some(ctx.block_time);
            self.assets.update(&asset).await?;
            summary.assets_updated += 1;
        }

        record_transaction(
            self.transactions.as_ref(),
            tx,
            ctx,
            TxClassification::AssetTransfer,
            None,
        )
        .await?;

        Ok(summary)
    }

    /// Look an output's asset up by id (unit selector stripped) or by name
    async fn resolve_marker(&self, marker: &ScriptAsset) -> Result<Option<Asset>, DbError> {
        if let Some(id) = marker.asset_id.as_deref().filter(|id| !id.is_empty()) {
            if let Some(asset) = self.assets.find_by_id(strip_asset_suffix(id)).await? {
                return Ok(Some(asset));
            }
        }

        match marker.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => self.assets.find_by_name(name).await,
            None => Ok(None),
        }
    }
}

/// Sum of transfer-type amounts in `rows`
pub fn transferred_total(rows: &[AssetTransfer]) -> Decimal {
    rows.iter()
        .filter(|row| row.transfer_type == TransferType::Transfer)
        .map(|row| row.amount)
        .sum()
}
