use std::sync::Arc;

use rtm_asset_indexer::application::sync::{stop_channel, SyncDaemon};
use rtm_asset_indexer::config::AppConfig;
use rtm_asset_indexer::domain::services::IpfsMetadataCache;
use rtm_asset_indexer::infrastructure::ipfs::IpfsGatewayClient;
use rtm_asset_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use rtm_asset_indexer::infrastructure::rpc::{ChainRpc, RpcClient};
use rtm_asset_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let config = AppConfig::from_env();
    logging::log_info(&format!(
        "Starting rtm-asset-indexer v{} for stream {}",
        env!("CARGO_PKG_VERSION"),
        config.sync.stream_id
    ));
    logging::log_rpc_connection_details(&config.rpc.host, &config.rpc.port, &config.rpc.username);

    let db_pool = DbPool::new(&config).await?;
    let repositories = RepositoryFactory::create_repositories(&db_pool);

    let rpc = Arc::new(RpcClient::new(&config.rpc)?);
    if !rpc.check_health().await {
        logging::log_warning("Node is not answering yet; the sync loop will keep retrying");
    }

    let gateway = Arc::new(IpfsGatewayClient::new(&config.ipfs)?);
    let metadata = Arc::new(IpfsMetadataCache::new(
        gateway,
        repositories.ipfs_cache.clone(),
        config.ipfs.failure_retry_secs,
    ));

    let (stop_handle, stop_signal) = stop_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logging::log_info("Received Ctrl+C, finishing the current block");
                stop_handle.stop();
            }
            Err(e) => logging::log_error(&format!("Failed to listen for Ctrl+C: {}", e)),
        }
    });

    let mut daemon = SyncDaemon::new(rpc, &repositories, metadata, config.sync.clone(), stop_signal);
    let state = daemon.run().await?;

    logging::log_info(&format!(
        "Sync stopped at height {} with status {}",
        state.current_block, state.status
    ));
    Ok(())
}
