use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::fmt;

use super::FutureOutputRepository;
use crate::domain::models::{FutureOutput, FutureStatus, LockType, UnlockTrigger};
use crate::infrastructure::persistence::entities::future_outputs;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed store for time and height locked outputs
#[derive(Clone)]
pub struct SeaOrmFutureOutputRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmFutureOutputRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmFutureOutputRepository")
            .finish_non_exhaustive()
    }
}

impl SeaOrmFutureOutputRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_domain_model(entity: future_outputs::Model) -> Result<FutureOutput, DbError> {
        let lock_type = entity
            .lock_type
            .parse::<LockType>()
            .map_err(DbError::MappingError)?;
        let status = entity
            .status
            .parse::<FutureStatus>()
            .map_err(DbError::MappingError)?;
        let unlocked_by = entity
            .unlocked_by
            .map(|value| value.parse::<UnlockTrigger>())
            .transpose()
            .map_err(DbError::MappingError)?;

        Ok(FutureOutput {
            txid: entity.txid,
            vout: entity.vout.max(0) as u32,
            lock_type,
            asset_id: entity.asset_id,
            asset_name: entity.asset_name,
            amount: entity.amount,
            recipient: entity.recipient,
            maturity: entity.maturity,
            lock_time: entity.lock_time,
            unlock_height: entity.unlock_height.map(|h| h.max(0) as u64),
            unlock_time: entity.unlock_time,
            updatable_by_destination: entity.updatable_by_destination,
            block_height: entity.block_height.max(0) as u64,
            block_time: entity.block_time,
            status,
            unlocked_by,
            unlocked_at_height: entity.unlocked_at_height.map(|h| h.max(0) as u64),
            unlocked_at_time: entity.unlocked_at_time,
        })
    }
}

#[async_trait]
impl FutureOutputRepository for SeaOrmFutureOutputRepository {
    async fn find(&self, txid: &str, vout: u32) -> Result<Option<FutureOutput>, DbError> {
        let result = future_outputs::Entity::find_by_id((txid.to_string(), vout as i32))
            .one(&self.conn)
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    async fn insert(&self, future: &FutureOutput) -> Result<bool, DbError> {
        let now = Utc::now();
        let model = future_outputs::ActiveModel {
            txid: Set(future.txid.clone()),
            vout: Set(future.vout as i32),
            lock_type: Set(future.lock_type.as_str().to_string()),
            asset_id: Set(future.asset_id.clone()),
            asset_name: Set(future.asset_name.clone()),
            amount: Set(future.amount),
            recipient: Set(future.recipient.clone()),
            maturity: Set(future.maturity),
            lock_time: Set(future.lock_time),
            unlock_height: Set(future.unlock_height.map(|h| h as i64)),
            unlock_time: Set(future.unlock_time),
            updatable_by_destination: Set(future.updatable_by_destination),
            block_height: Set(future.block_height as i64),
            block_time: Set(future.block_time),
            status: Set(future.status.as_str().to_string()),
            unlocked_by: Set(future.unlocked_by.map(|t| t.as_str().to_string())),
            unlocked_at_height: Set(future.unlocked_at_height.map(|h| h as i64)),
            unlocked_at_time: Set(future.unlocked_at_time),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let rows = future_outputs::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([future_outputs::Column::Txid, future_outputs::Column::Vout])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(rows > 0)
    }

    async fn find_matured(&self, height: u64, time: i64) -> Result<Vec<FutureOutput>, DbError> {
        let rows = future_outputs::Entity::find()
            .filter(future_outputs::Column::Status.eq(FutureStatus::Locked.as_str()))
            .filter(
                Condition::any()
                    .add(future_outputs::Column::UnlockHeight.lte(height as i64))
                    .add(future_outputs::Column::UnlockTime.lte(time)),
            )
            .order_by_asc(future_outputs::Column::BlockHeight)
            .order_by_asc(future_outputs::Column::Txid)
            .order_by_asc(future_outputs::Column::Vout)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::to_domain_model).collect()
    }

    async fn mark_unlocked(
        &self,
        txid: &str,
        vout: u32,
        trigger: UnlockTrigger,
        height: u64,
        time: i64,
    ) -> Result<bool, DbError> {
        let result = future_outputs::Entity::update_many()
            .col_expr(
                future_outputs::Column::Status,
                Expr::value(FutureStatus::Unlocked.as_str()),
            )
            .col_expr(
                future_outputs::Column::UnlockedBy,
                Expr::value(Some(trigger.as_str().to_string())),
            )
            .col_expr(
                future_outputs::Column::UnlockedAtHeight,
                Expr::value(Some(height as i64)),
            )
            .col_expr(future_outputs::Column::UnlockedAtTime, Expr::value(Some(time)))
            .col_expr(future_outputs::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(future_outputs::Column::Txid.eq(txid))
            .filter(future_outputs::Column::Vout.eq(vout as i32))
            .filter(future_outputs::Column::Status.eq(FutureStatus::Locked.as_str()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
