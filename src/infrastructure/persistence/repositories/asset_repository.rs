use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::AssetRepository;
use crate::domain::models::{Asset, AssetKind};
use crate::infrastructure::persistence::entities::assets;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed asset repository
#[derive(Debug, Clone)]
pub struct SeaOrmAssetRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_active_model(asset: &Asset) -> assets::ActiveModel {
        assets::ActiveModel {
            asset_id: Set(asset.asset_id.clone()),
            name: Set(asset.name.clone()),
            asset_type: Set(asset.asset_type.as_str().to_string()),
            creator: Set(asset.creator.clone()),
            current_owner: Set(asset.current_owner.clone()),
            mint_count: Set(asset.mint_count as i64),
            max_mint_count: Set(asset.max_mint_count as i64),
            total_supply: Set(asset.total_supply),
            circulating_supply: Set(asset.circulating_supply),
            transfer_count: Set(asset.transfer_count as i64),
            decimal_point: Set(asset.decimal_point as i32),
            updatable: Set(asset.updatable),
            is_unique: Set(asset.is_unique),
            reference_hash: Set(asset.reference_hash.clone()),
            ipfs_verified: Set(asset.ipfs_verified),
            metadata: Set(asset.metadata.clone()),
            image_url: Set(asset.image_url.clone()),
            is_sub_asset: Set(asset.is_sub_asset),
            parent_asset_id: Set(asset.parent_asset_id.clone()),
            parent_asset_name: Set(asset.parent_asset_name.clone()),
            sub_asset_name: Set(asset.sub_asset_name.clone()),
            block_height: Set(asset.block_height as i64),
            created_time: Set(asset.created_time),
            last_mint_time: Set(asset.last_mint_time),
            last_transfer_time: Set(asset.last_transfer_time),
            updated_at: Set(Utc::now()),
        }
    }

    fn to_domain_model(entity: assets::Model) -> Result<Asset, DbError> {
        let asset_type = entity
            .asset_type
            .parse::<AssetKind>()
            .map_err(DbError::MappingError)?;

        Ok(Asset {
            asset_id: entity.asset_id,
            name: entity.name,
            asset_type,
            creator: entity.creator,
            current_owner: entity.current_owner,
            mint_count: entity.mint_count.max(0) as u64,
            max_mint_count: entity.max_mint_count.max(0) as u64,
            total_supply: entity.total_supply,
            circulating_supply: entity.circulating_supply,
            transfer_count: entity.transfer_count.max(0) as u64,
            decimal_point: entity.decimal_point.clamp(0, u8::MAX as i32) as u8,
            updatable: entity.updatable,
            is_unique: entity.is_unique,
            reference_hash: entity.reference_hash,
            ipfs_verified: entity.ipfs_verified,
            metadata: entity.metadata,
            image_url: entity.image_url,
            is_sub_asset: entity.is_sub_asset,
            parent_asset_id: entity.parent_asset_id,
            parent_asset_name: entity.parent_asset_name,
            sub_asset_name: entity.sub_asset_name,
            block_height: entity.block_height.max(0) as u64,
            created_time: entity.created_time,
            last_mint_time: entity.last_mint_time,
            last_transfer_time: entity.last_transfer_time,
        })
    }
}

#[async_trait]
impl AssetRepository for SeaOrmAssetRepository {
    async fn find_by_id(&self, asset_id: &str) -> Result<Option<Asset>, DbError> {
        let result = assets::Entity::find_by_id(asset_id.to_string())
            .one(&self.db)
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    /// Names are not unique across `UNKNOWN|leaf` fallbacks; the oldest asset wins
    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, DbError> {
        let result = assets::Entity::find()
            .filter(assets::Column::Name.eq(name))
            .order_by_asc(assets::Column::BlockHeight)
            .one(&self.db)
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    async fn insert(&self, asset: &Asset) -> Result<bool, DbError> {
        let rows = assets::Entity::insert(Self::to_active_model(asset))
            .on_conflict(
                OnConflict::column(assets::Column::AssetId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(rows > 0)
    }

    async fn update(&self, asset: &Asset) -> Result<(), DbError> {
        let mut model = Self::to_active_model(asset);
        // Creation-time fields are never rewritten
        model.block_height = sea_orm::NotSet;
        model.created_time = sea_orm::NotSet;
        model.creator = sea_orm::NotSet;

        model.update(&self.db).await?;
        Ok(())
    }
}
