//! JSON-RPC over HTTP client for the Raptoreum node

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use super::types::{BlockchainInfo, RpcBlock};
use super::{BlockRef, ChainRpc};
use crate::config::RpcConfig;
use crate::infrastructure::rpc::error::RpcError;

/// Client for the node's JSON-RPC interface. Carries no retry policy.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl RpcClient {
    /// Create a new RPC client
    pub fn new(config: &RpcConfig) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Issue one JSON-RPC request and return its `result` member
    pub async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request_body = json!({
            "jsonrpc": "1.0",
            "id": "rtm-asset-indexer",
            "method": method,
            "params": params
        });

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RpcError::Auth(format!(
                "Node rejected credentials for {} ({})",
                method, status
            )));
        }

        let response_text = response.text().await?;

        // The node reports RPC failures as non-2xx statuses with a JSON error body
        let response_json: Value = match serde_json::from_str(&response_text) {
            Ok(json) => json,
            Err(e) if status.is_success() => return Err(RpcError::Parse(e.to_string())),
            Err(_) => return Err(RpcError::Http(status.as_u16())),
        };

        if let Some(error) = response_json.get("error").filter(|e| !e.is_null()) {
            return Err(RpcError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        if !status.is_success() {
            return Err(RpcError::Http(status.as_u16()));
        }

        response_json
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::Parse(format!("No result in {} response", method)))
    }

    async fn typed_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let result = self.rpc_call(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            RpcError::Parse(format!("Invalid {} result: {}", method, e))
        })
    }
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError> {
        self.typed_call("getblockchaininfo", json!([])).await
    }

    async fn get_block_hash(&self, height: u64) -> Result<String, RpcError> {
        let result = self.rpc_call("getblockhash", json!([height])).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcError::Parse("Invalid block hash".to_string()))
    }

    async fn get_block(&self, block: BlockRef<'_>, verbosity: u8) -> Result<RpcBlock, RpcError> {
        let hash = match block {
            BlockRef::Hash(hash) => hash.to_string(),
            BlockRef::Height(height) => self.get_block_hash(height).await?,
        };
        self.typed_call("getblock", json!([hash, verbosity])).await
    }
}
