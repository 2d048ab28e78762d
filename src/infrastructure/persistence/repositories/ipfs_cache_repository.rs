use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::fmt;

use super::IpfsCacheRepository;
use crate::domain::models::{CacheStatus, IpfsCacheEntry};
use crate::infrastructure::persistence::entities::ipfs_cache;
use crate::infrastructure::persistence::error::DbError;

#[derive(Clone)]
pub struct SeaOrmIpfsCacheRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmIpfsCacheRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmIpfsCacheRepository")
            .finish_non_exhaustive()
    }
}

impl SeaOrmIpfsCacheRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_domain_model(entity: ipfs_cache::Model) -> IpfsCacheEntry {
        IpfsCacheEntry {
            hash: entity.hash,
            metadata: entity.metadata,
            status: CacheStatus::parse(&entity.status),
            access_count: entity.access_count.max(0) as u64,
            fetched_at: entity.fetched_at,
            last_accessed_at: entity.last_accessed_at,
        }
    }
}

#[async_trait]
impl IpfsCacheRepository for SeaOrmIpfsCacheRepository {
    async fn get(&self, hash: &str) -> Result<Option<IpfsCacheEntry>, DbError> {
        let result = ipfs_cache::Entity::find_by_id(hash.to_string())
            .one(&self.conn)
            .await?;

        Ok(result.map(Self::to_domain_model))
    }

    async fn put(&self, entry: &IpfsCacheEntry) -> Result<(), DbError> {
        let model = ipfs_cache::ActiveModel {
            hash: Set(entry.hash.clone()),
            metadata: Set(entry.metadata.clone()),
            status: Set(entry.status.as_str().to_string()),
            access_count: Set(entry.access_count as i64),
            fetched_at: Set(entry.fetched_at),
            last_accessed_at: Set(entry.last_accessed_at),
        };

        ipfs_cache::Entity::insert(model)
            .on_conflict(
                OnConflict::column(ipfs_cache::Column::Hash)
                    .update_columns([
                        ipfs_cache::Column::Metadata,
                        ipfs_cache::Column::Status,
                        ipfs_cache::Column::AccessCount,
                        ipfs_cache::Column::FetchedAt,
                        ipfs_cache::Column::LastAccessedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    async fn record_access(&self, hash: &str) -> Result<(), DbError> {
        ipfs_cache::Entity::update_many()
            .col_expr(
                ipfs_cache::Column::AccessCount,
                Expr::col(ipfs_cache::Column::AccessCount).add(1),
            )
            .col_expr(ipfs_cache::Column::LastAccessedAt, Expr::value(Utc::now()))
            .filter(ipfs_cache::Column::Hash.eq(hash))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
