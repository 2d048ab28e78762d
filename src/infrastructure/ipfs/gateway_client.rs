use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::IpfsError;
use super::ContentGateway;
use crate::config::IpfsConfig;
use crate::utils::logging;

/// HTTP client fetching JSON documents through public IPFS gateways
pub struct IpfsGatewayClient {
    client: Client,
    gateways: Vec<String>,
}

impl IpfsGatewayClient {
    pub fn new(config: &IpfsConfig) -> Result<Self, IpfsError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms.min(5000)))
            .build()?;

        Ok(IpfsGatewayClient {
            client,
            gateways: config.gateways.clone(),
        })
    }

    /// Ask one gateway for `hash`
    async fn fetch_from(&self, gateway: &str, hash: &str) -> Result<Value, IpfsError> {
        let url = gateway_url(gateway, hash);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IpfsError::StatusError(status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        if body.is_object() {
            Ok(body)
        } else {
            Err(IpfsError::InvalidContent(format!(
                "expected JSON object from {}",
                url
            )))
        }
    }
}

#[async_trait]
impl ContentGateway for IpfsGatewayClient {
    async fn fetch_json(&self, hash: &str) -> Result<Value, IpfsError> {
        for gateway in &self.gateways {
            match self.fetch_from(gateway, hash).await {
                Ok(document) => return Ok(document),
                Err(e) => {
                    logging::log_debug(&format!(
                        "IPFS gateway {} failed for {}: {}",
                        gateway, hash, e
                    ));
                }
            }
        }

        Err(IpfsError::Exhausted(hash.to_string()))
    }

    fn primary_gateway(&self) -> Option<&str> {
        self.gateways.first().map(String::as_str)
    }
}

/// Join a gateway base and a content path without doubling slashes
pub fn gateway_url(gateway: &str, path: &str) -> String {
    format!(
        "{}/{}",
        gateway.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
