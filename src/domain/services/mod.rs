pub mod asset_processor;
pub mod future_checker;
pub mod metadata_cache;
pub mod sync_state_store;
pub mod transaction_log;
pub mod tx_router;

pub use asset_processor::AssetProcessor;
pub use future_checker::FutureChecker;
pub use metadata_cache::{IpfsMetadataCache, MetadataProvider};
pub use sync_state_store::SyncStateStore;
pub use tx_router::{RouteOutcome, TransactionRouter, TxKind};
