pub mod asset;
pub mod asset_transfer;
pub mod block;
pub mod future_output;
pub mod ipfs_cache;
pub mod sync_state;
pub mod transaction;

pub use asset::{Asset, AssetKind};
pub use asset_transfer::{AssetTransfer, TransferType};
pub use block::Block;
pub use future_output::{FutureOutput, FutureStatus, LockType, UnlockTrigger};
pub use ipfs_cache::{CacheStatus, IpfsCacheEntry};
pub use sync_state::{SyncState, SyncStateUpdate, SyncStatus};
pub use transaction::{Transaction, TxClassification, TxContext};
