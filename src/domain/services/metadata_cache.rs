//! Asset metadata lookup backed by IPFS gateways and a persistent cache.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::models::{CacheStatus, IpfsCacheEntry};
use crate::infrastructure::ipfs::{gateway_url, ContentGateway};
use crate::infrastructure::persistence::repositories::IpfsCacheRepository;
use crate::utils::logging;

/// Metadata source consumed by the asset processor
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// JSON document stored under `hash`, or `None` when it cannot be fetched
    async fn fetch_metadata(&self, hash: &str) -> Option<Value>;

    /// Public URL for the image referenced by `metadata[field]`
    fn resolve_image_url(&self, metadata: &Value, field: &str) -> Option<String>;
}

pub struct IpfsMetadataCache {
    gateway: Arc<dyn ContentGateway>,
    cache: Arc<dyn IpfsCacheRepository>,
    failure_retry: Duration,
}

impl IpfsMetadataCache {
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        cache: Arc<dyn IpfsCacheRepository>,
        failure_retry_secs: i64,
    ) -> Self {
        Self {
            gateway,
            cache,
            failure_retry: Duration::seconds(failure_retry_secs),
        }
    }

    async fn store(&self, entry: IpfsCacheEntry) {
        if let Err(e) = self.cache.put(&entry).await {
            logging::log_warning(&format!(
                "Failed to cache IPFS entry {}: {}",
                entry.hash, e
            ));
        }
    }
}

#[async_trait]
impl MetadataProvider for IpfsMetadataCache {
    async fn fetch_metadata(&self, hash: &str) -> Option<Value> {
        let hash = hash.trim();
        if hash.is_empty() {
            return None;
        }

        match self.cache.get(hash).await {
            Ok(Some(entry)) => match entry.status {
                CacheStatus::Success if entry.metadata.is_some() => {
                    if let Err(e) = self.cache.record_access(hash).await {
                        logging::log_warning(&format!(
                            "Failed to record IPFS cache access for {}: {}",
                            hash, e
                        ));
                    }
                    return entry.metadata;
                }
                CacheStatus::Failed if Utc::now() - entry.fetched_at < self.failure_retry => {
                    logging::log_debug(&format!("IPFS hash {} failed recently, skipping", hash));
                    return None;
                }
                _ => {}
            },
            Ok(None) => {}
            Err(e) => {
                logging::log_warning(&format!("IPFS cache lookup failed for {}: {}", hash, e));
            }
        }

        match self.gateway.fetch_json(hash).await {
            Ok(metadata) => {
                self.store(IpfsCacheEntry::success(hash, metadata.clone()))
                    .await;
                Some(metadata)
            }
            Err(e) => {
                logging::log_warning(&format!("IPFS metadata unavailable: {}", e));
                self.store(IpfsCacheEntry::failed(hash)).await;
                None
            }
        }
    }

    fn resolve_image_url(&self, metadata: &Value, field: &str) -> Option<String> {
        let raw = metadata.get(field)?.as_str()?.trim();
        resolve_content_url(raw, self.gateway.primary_gateway())
    }
}

/// Turn an `ipfs://`, bare CID, or http(s) reference into a fetchable URL
pub fn resolve_content_url(raw: &str, gateway: Option<&str>) -> Option<String> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }

    let path = match raw.strip_prefix("ipfs://") {
        Some(rest) => rest.trim_start_matches("ipfs/"),
        None if is_cid(raw) => raw,
        None => return None,
    };

    if path.is_empty() {
        return None;
    }
    gateway.map(|gateway| gateway_url(gateway, path))
}

fn is_cid(value: &str) -> bool {
    let cid = value.split('/').next().unwrap_or_default();
    let alphanumeric = cid.chars().all(|c| c.is_ascii_alphanumeric());
    (cid.starts_with("Qm") && cid.len() == 46 && alphanumeric)
        || (cid.starts_with("baf") && cid.len() > 50 && alphanumeric)
}
