use super::asset_ref::matches_marker;
use super::AssetProcessor;
use crate::domain::errors::ProcessingError;
use crate::domain::models::{Asset, AssetTransfer, TransferType, TxClassification, TxContext};
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::rpc::types::{MintAssetPayload, RpcTransaction};
use crate::utils::logging;

impl AssetProcessor {
    /// Apply a type-10 mint to its asset
    pub async fn mint(
        &self,
        tx: &RpcTransaction,
        payload: &MintAssetPayload,
        ctx: &TxContext,
    ) -> Result<Asset, ProcessingError> {
        let mut asset = self
            .assets
            .find_by_id(&payload.asset_id)
            .await?
            .ok_or_else(|| {
                ProcessingError::data(format!(
                    "mint {} references unknown asset {}",
                    tx.txid, payload.asset_id
                ))
            })?;

        // Outputs of other assets riding along in the same tx are not part of the mint
        let (recipient, amount) = tx
            .asset_outputs()
            .find_map(|out| {
                let marker = out.script_pub_key.asset.as_ref()?;
                if !matches_marker(&asset, marker) {
                    return None;
                }
                Some((out.recipient()?.to_string(), marker.amount))
            })
            .ok_or_else(|| {
                ProcessingError::data(format!(
                    "mint {} has no {} output with a recipient",
                    tx.txid, asset.name
                ))
            })?;

        let transfer = AssetTransfer {
            txid: tx.txid.clone(),
            asset_id: asset.asset_id.clone(),
            asset_name: asset.name.clone(),
            from: None,
            to: recipient.clone(),
            amount,
            transfer_type: TransferType::Mint,
            block_height: ctx.height,
            timestamp: ctx.block_time,
        };

        if self.transfers.upsert(&transfer).await? {
            if asset.mint_limit_reached() {
                logging::log_warning(&format!(
                    "Asset {} minted beyond its limit of {} in {}",
                    asset.name, asset.max_mint_count, tx.txid
                ));
            }

            asset.mint_count += 1;
            asset.circulating_supply += amount;
            asset.current_owner = recipient;
            asset.last_mint_time = Some(ctx.block_time);
            self.assets.update(&asset).await?;

            logging::log_debug(&format!(
                "Minted {} {} to {} (mint #{})",
                amount, asset.name, asset.current_owner, asset.mint_count
            ));
        }

        record_transaction(
            self.transactions.as_ref(),
            tx,
            ctx,
            TxClassification::AssetMint,
            serde_json::to_value(payload).ok(),
        )
        .await?;

        Ok(asset)
    }
}
