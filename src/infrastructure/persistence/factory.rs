use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{
    Repositories, SeaOrmAssetRepository, SeaOrmAssetTransferRepository, SeaOrmBlockRepository,
    SeaOrmFutureOutputRepository, SeaOrmIpfsCacheRepository, SeaOrmSyncStateRepository,
    SeaOrmTransactionRepository,
};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories on one shared connection pool
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();

        Repositories {
            sync_state: Arc::new(Self::create_sync_state_repository(conn.clone())),
            block: Arc::new(SeaOrmBlockRepository::new(conn.clone())),
            transaction: Arc::new(SeaOrmTransactionRepository::new(conn.clone())),
            asset: Arc::new(SeaOrmAssetRepository::new(conn.clone())),
            asset_transfer: Arc::new(SeaOrmAssetTransferRepository::new(conn.clone())),
            future_output: Arc::new(SeaOrmFutureOutputRepository::new(conn.clone())),
            ipfs_cache: Arc::new(SeaOrmIpfsCacheRepository::new(conn)),
        }
    }

    /// Create a sync state repository
    pub fn create_sync_state_repository(conn: DatabaseConnection) -> SeaOrmSyncStateRepository {
        SeaOrmSyncStateRepository::new(conn)
    }
}
