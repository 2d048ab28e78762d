use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use std::fmt;

use super::SyncStateRepository;
use crate::domain::models::{SyncState, SyncStatus};
use crate::infrastructure::persistence::entities::sync_state;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed sync progress repository
#[derive(Clone)]
pub struct SeaOrmSyncStateRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmSyncStateRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmSyncStateRepository")
            .finish_non_exhaustive()
    }
}

impl SeaOrmSyncStateRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_domain_model(entity: sync_state::Model) -> Result<SyncState, DbError> {
        let status = entity
            .status
            .parse::<SyncStatus>()
            .map_err(DbError::MappingError)?;

        Ok(SyncState {
            stream_id: entity.stream_id,
            current_block: entity.current_block.max(0) as u64,
            target_block: entity.target_block.max(0) as u64,
            status,
            last_synced_at: entity.last_synced_at,
            last_error: entity.last_error,
            average_block_time: entity.average_block_time,
            updated_at: entity.updated_at,
        })
    }
}

#[async_trait]
impl SyncStateRepository for SeaOrmSyncStateRepository {
    async fn find(&self, stream_id: &str) -> Result<Option<SyncState>, DbError> {
        let result = sync_state::Entity::find_by_id(stream_id.to_string())
            .one(&self.conn)
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    async fn save(&self, state: &SyncState) -> Result<(), DbError> {
        let model = sync_state::ActiveModel {
            stream_id: Set(state.stream_id.clone()),
            current_block: Set(state.current_block as i64),
            target_block: Set(state.target_block as i64),
            status: Set(state.status.as_str().to_string()),
            last_synced_at: Set(state.last_synced_at),
            last_error: Set(state.last_error.clone()),
            average_block_time: Set(state.average_block_time),
            updated_at: Set(state.updated_at),
        };

        sync_state::Entity::insert(model)
            .on_conflict(
                OnConflict::column(sync_state::Column::StreamId)
                    .update_columns([
                        sync_state::Column::CurrentBlock,
                        sync_state::Column::TargetBlock,
                        sync_state::Column::Status,
                        sync_state::Column::LastSyncedAt,
                        sync_state::Column::LastError,
                        sync_state::Column::AverageBlockTime,
                        sync_state::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }
}
