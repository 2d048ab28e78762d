//! IPFS gateway access used to resolve asset reference hashes.

mod error;
pub mod gateway_client;

pub use error::IpfsError;
pub use gateway_client::{gateway_url, IpfsGatewayClient};

use async_trait::async_trait;
use serde_json::Value;

/// Source of IPFS documents; gateways are tried in configured order
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Fetch `hash` as a JSON object from the first gateway that serves it
    async fn fetch_json(&self, hash: &str) -> Result<Value, IpfsError>;

    /// Gateway used when building public links
    fn primary_gateway(&self) -> Option<&str>;
}
