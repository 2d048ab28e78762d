pub mod asset_transfers;
pub mod assets;
pub mod blocks;
pub mod future_outputs;
pub mod ipfs_cache;
pub mod sync_state;
pub mod transactions;
