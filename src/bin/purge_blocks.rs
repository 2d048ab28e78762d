//! Operator tool: drop blocks and transactions above a height and rewind the
//! sync checkpoint so they are fetched again.
//!
//! Asset, transfer and future rows derived from the purged blocks are left in
//! place. Usage: `purge-blocks <height>`

use anyhow::{bail, Context};

use rtm_asset_indexer::config::AppConfig;
use rtm_asset_indexer::domain::models::SyncStateUpdate;
use rtm_asset_indexer::domain::services::SyncStateStore;
use rtm_asset_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use rtm_asset_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let height: u64 = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid height: {}", raw))?,
        None => bail!("usage: purge-blocks <height>"),
    };

    let config = AppConfig::from_env();
    let db_pool = DbPool::new(&config).await?;
    let repositories = RepositoryFactory::create_repositories(&db_pool);

    let blocks = repositories.block.delete_above(height).await?;
    let transactions = repositories.transaction.delete_above(height).await?;

    let mut store = SyncStateStore::new(
        repositories.sync_state.clone(),
        config.sync.stream_id.clone(),
        config.sync.start_height,
    );
    let state = store.load().await?;
    if state.current_block > height {
        store
            .update(SyncStateUpdate::default().with_current_block(height))
            .await?;
    }

    logging::log_info(&format!(
        "[{}] Purged {} block(s) and {} transaction(s) above height {}",
        config.sync.stream_id, blocks, transactions, height
    ));
    Ok(())
}
