use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use std::fmt;

use super::BlockRepository;
use crate::domain::models::Block;
use crate::infrastructure::persistence::entities::blocks;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed block repository
#[derive(Clone)]
pub struct SeaOrmBlockRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmBlockRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmBlockRepository").finish_non_exhaustive()
    }
}

impl SeaOrmBlockRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_domain_model(entity: blocks::Model) -> Block {
        let txids = match entity.txids {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Block {
            height: entity.height.max(0) as u64,
            hash: entity.hash,
            previous_hash: entity.previous_hash,
            timestamp: entity.timestamp,
            txids,
            size: entity.size.max(0) as u64,
        }
    }
}

#[async_trait]
impl BlockRepository for SeaOrmBlockRepository {
    async fn find_by_height(&self, height: u64) -> Result<Option<Block>, DbError> {
        let result = blocks::Entity::find_by_id(height as i64)
            .one(&self.conn)
            .await?;

        Ok(result.map(Self::to_domain_model))
    }

    async fn insert(&self, block: &Block) -> Result<bool, DbError> {
        let model = blocks::ActiveModel {
            height: Set(block.height as i64),
            hash: Set(block.hash.clone()),
            previous_hash: Set(block.previous_hash.clone()),
            timestamp: Set(block.timestamp),
            tx_count: Set(block.txids.len() as i32),
            txids: Set(serde_json::json!(block.txids)),
            size: Set(block.size as i64),
            created_at: Set(Utc::now()),
        };

        let rows = blocks::Entity::insert(model)
            .on_conflict(
                OnConflict::column(blocks::Column::Height)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(rows > 0)
    }

    async fn delete_above(&self, height: u64) -> Result<u64, DbError> {
        let result = blocks::Entity::delete_many()
            .filter(blocks::Column::Height.gt(height as i64))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
