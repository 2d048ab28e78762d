use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use std::fmt;

use super::AssetTransferRepository;
use crate::domain::models::{AssetTransfer, TransferType};
use crate::infrastructure::persistence::entities::asset_transfers;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed transfer ledger
#[derive(Clone)]
pub struct SeaOrmAssetTransferRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmAssetTransferRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmAssetTransferRepository")
            .finish_non_exhaustive()
    }
}

impl SeaOrmAssetTransferRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_domain_model(entity: asset_transfers::Model) -> Result<AssetTransfer, DbError> {
        let transfer_type = entity
            .transfer_type
            .parse::<TransferType>()
            .map_err(DbError::MappingError)?;

        Ok(AssetTransfer {
            txid: entity.txid,
            asset_id: entity.asset_id,
            asset_name: entity.asset_name,
            from: entity.from_address,
            to: entity.to_address,
            amount: entity.amount,
            transfer_type,
            block_height: entity.block_height.max(0) as u64,
            timestamp: entity.timestamp,
        })
    }
}

#[async_trait]
impl AssetTransferRepository for SeaOrmAssetTransferRepository {
    async fn upsert(&self, transfer: &AssetTransfer) -> Result<bool, DbError> {
        let model = asset_transfers::ActiveModel {
            id: NotSet,
            txid: Set(transfer.txid.clone()),
            asset_id: Set(transfer.asset_id.clone()),
            asset_name: Set(transfer.asset_name.clone()),
            from_address: Set(transfer.from.clone()),
            to_address: Set(transfer.to.clone()),
            amount: Set(transfer.amount),
            transfer_type: Set(transfer.transfer_type.as_str().to_string()),
            block_height: Set(transfer.block_height as i64),
            timestamp: Set(transfer.timestamp),
            created_at: Set(Utc::now()),
        };

        let rows = asset_transfers::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    asset_transfers::Column::Txid,
                    asset_transfers::Column::AssetName,
                    asset_transfers::Column::ToAddress,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(rows > 0)
    }

    async fn find_by_asset(&self, asset_id: &str) -> Result<Vec<AssetTransfer>, DbError> {
        let rows = asset_transfers::Entity::find()
            .filter(asset_transfers::Column::AssetId.eq(asset_id))
            .order_by_asc(asset_transfers::Column::BlockHeight)
            .order_by_asc(asset_transfers::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::to_domain_model).collect()
    }
}
