use rust_decimal::Decimal;
use serde_json::Value;

use super::asset_ref::{sub_asset_name, UNKNOWN_PARENT};
use super::AssetProcessor;
use crate::domain::errors::ProcessingError;
use crate::domain::models::{Asset, AssetKind, TxClassification, TxContext};
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::rpc::types::{NewAssetPayload, RpcTransaction};
use crate::utils::logging;

/// Name and parent linkage resolved for a new asset
struct ResolvedName {
    name: String,
    parent_asset_id: Option<String>,
    parent_asset_name: Option<String>,
    sub_asset_name: Option<String>,
}

impl AssetProcessor {
    /// Create the asset defined by a type-8 transaction.
    ///
    /// Replaying a creation leaves the stored asset as it is.
    pub async fn create(
        &self,
        tx: &RpcTransaction,
        payload: &NewAssetPayload,
        ctx: &TxContext,
    ) -> Result<Asset, ProcessingError> {
        let leaf = payload.name.trim();
        if leaf.is_empty() {
            return Err(ProcessingError::data(format!(
                "asset creation {} has an empty name",
                tx.txid
            )));
        }

        record_transaction(
            self.transactions.as_ref(),
            tx,
            ctx,
            TxClassification::AssetCreate,
            serde_json::to_value(payload).ok(),
        )
        .await?;

        if let Some(existing) = self.assets.find_by_id(&tx.txid).await? {
            return Ok(existing);
        }

        let resolved = self.resolve_name(payload, leaf).await?;

        let mut metadata: Option<Value> = None;
        let mut image_url = None;
        let reference_hash = payload
            .reference_hash
            .as_deref()
            .map(str::trim)
            .filter(|hash| !hash.is_empty());
        if let Some(hash) = reference_hash {
            metadata = self.metadata.fetch_metadata(hash).await;
            image_url = metadata
                .as_ref()
                .and_then(|m| self.metadata.resolve_image_url(m, "image"));
        }

        let total_supply = payload
            .amount
            .map(|amount| amount * Decimal::from(payload.max_mint_count))
            .unwrap_or(Decimal::ZERO);

        let asset = Asset {
            asset_id: tx.txid.clone(),
            name: resolved.name,
            asset_type: if payload.is_unique {
                AssetKind::Unique
            } else {
                AssetKind::Fungible
            },
            creator: payload.owner_address.clone(),
            current_owner: payload.owner_address.clone(),
            mint_count: 0,
            max_mint_count: payload.max_mint_count,
            total_supply,
            circulating_supply: Decimal::ZERO,
            transfer_count: 0,
            decimal_point: payload.decimal_point,
            updatable: payload.updatable,
            is_unique: payload.is_unique,
            reference_hash: reference_hash.map(str::to_string),
            ipfs_verified: metadata.is_some(),
            metadata,
            image_url,
            is_sub_asset: !payload.is_root,
            parent_asset_id: resolved.parent_asset_id,
            parent_asset_name: resolved.parent_asset_name,
            sub_asset_name: resolved.sub_asset_name,
            block_height: ctx.height,
            created_time: ctx.block_time,
            last_mint_time: None,
            last_transfer_time: None,
        };

        if self.assets.insert(&asset).await? {
            logging::log_info(&format!(
                "Created asset {} ({}) at height {}",
                asset.name, asset.asset_id, ctx.height
            ));
        }

        Ok(asset)
    }

    /// Root assets keep their name. Sub-assets carry only the leaf on chain and
    /// are named after their parent, or `UNKNOWN` while the parent is missing.
    async fn resolve_name(
        &self,
        payload: &NewAssetPayload,
        leaf: &str,
    ) -> Result<ResolvedName, ProcessingError> {
        if payload.is_root {
            return Ok(ResolvedName {
                name: leaf.to_string(),
                parent_asset_id: None,
                parent_asset_name: None,
                sub_asset_name: None,
            });
        }

        let root_id = payload
            .root_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let parent = match root_id {
            Some(id) => self.assets.find_by_id(id).await?,
            None => None,
        };

        match parent {
            Some(parent) => Ok(ResolvedName {
                name: sub_asset_name(&parent.name, leaf),
                parent_asset_id: Some(parent.asset_id),
                parent_asset_name: Some(parent.name.to_uppercase()),
                sub_asset_name: Some(leaf.to_string()),
            }),
            None => {
                logging::log_warning(&format!(
                    "Parent {} of sub-asset {} is not indexed, naming it under {}",
                    root_id.unwrap_or("<none>"),
                    leaf,
                    UNKNOWN_PARENT
                ));
                Ok(ResolvedName {
                    name: sub_asset_name(UNKNOWN_PARENT, leaf),
                    parent_asset_id: root_id.map(str::to_string),
                    parent_asset_name: None,
                    sub_asset_name: Some(leaf.to_string()),
                })
            }
        }
    }
}
