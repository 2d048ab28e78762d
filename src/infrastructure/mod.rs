pub mod ipfs;
pub mod persistence;
pub mod rpc;
