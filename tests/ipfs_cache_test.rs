use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use rtm_asset_indexer::config::IpfsConfig;
use rtm_asset_indexer::domain::models::CacheStatus;
use rtm_asset_indexer::domain::services::{IpfsMetadataCache, MetadataProvider};
use rtm_asset_indexer::infrastructure::ipfs::{ContentGateway, IpfsError, IpfsGatewayClient};
use rtm_asset_indexer::infrastructure::persistence::repositories::IpfsCacheRepository;
use rtm_asset_indexer::infrastructure::persistence::MemoryStore;

struct FakeGateway {
    documents: HashMap<String, Value>,
    calls: AtomicU32,
}

impl FakeGateway {
    fn new(documents: &[(&str, Value)]) -> Arc<Self> {
        Arc::new(Self {
            documents: documents
                .iter()
                .map(|(hash, doc)| (hash.to_string(), doc.clone()))
                .collect(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl ContentGateway for FakeGateway {
    async fn fetch_json(&self, hash: &str) -> Result<Value, IpfsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(hash)
            .cloned()
            .ok_or_else(|| IpfsError::Exhausted(hash.to_string()))
    }

    fn primary_gateway(&self) -> Option<&str> {
        Some("https://ipfs.io/ipfs/")
    }
}

#[tokio::test]
async fn test_success_is_cached_and_counted() {
    let store = Arc::new(MemoryStore::new());
    let gateway = FakeGateway::new(&[("QmMeta", json!({"name": "Widget"}))]);
    let cache = IpfsMetadataCache::new(gateway.clone(), store.clone(), 3600);

    assert_eq!(cache.fetch_metadata("QmMeta").await, Some(json!({"name": "Widget"})));
    assert_eq!(cache.fetch_metadata("QmMeta").await, Some(json!({"name": "Widget"})));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

    let entry = store.get("QmMeta").await.unwrap().unwrap();
    assert_eq!(entry.status, CacheStatus::Success);
    assert_eq!(entry.access_count, 2);
}

#[tokio::test]
async fn test_recent_failure_is_not_refetched() {
    let store = Arc::new(MemoryStore::new());
    let gateway = FakeGateway::new(&[]);
    let cache = IpfsMetadataCache::new(gateway.clone(), store.clone(), 3600);

    assert_eq!(cache.fetch_metadata("QmGone").await, None);
    assert_eq!(cache.fetch_metadata("QmGone").await, None);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.get("QmGone").await.unwrap().map(|e| e.status),
        Some(CacheStatus::Failed)
    );
}

#[tokio::test]
async fn test_expired_failure_is_retried() {
    let store = Arc::new(MemoryStore::new());
    let gateway = FakeGateway::new(&[]);
    let cache = IpfsMetadataCache::new(gateway.clone(), store, 0);

    cache.fetch_metadata("QmGone").await;
    cache.fetch_metadata("QmGone").await;
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_image_url_uses_primary_gateway() {
    let cache = IpfsMetadataCache::new(FakeGateway::new(&[]), Arc::new(MemoryStore::new()), 60);
    let metadata = json!({"image": "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"});
    assert_eq!(
        cache.resolve_image_url(&metadata, "image").as_deref(),
        Some("https://ipfs.io/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG")
    );
    assert_eq!(cache.resolve_image_url(&metadata, "icon"), None);
}

/// Serve one HTTP response on a local port and return its gateway base URL
async fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buffer = [0u8; 2048];
            let _ = socket.read(&mut buffer).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/ipfs/", address)
}

#[tokio::test]
async fn test_gateway_client_falls_back_in_order() {
    let working = serve_once(r#"{"name":"Widget"}"#).await;
    let config = IpfsConfig {
        gateways: vec!["http://127.0.0.1:1/ipfs/".to_string(), working],
        timeout_ms: 2_000,
        failure_retry_secs: 60,
    };
    let client = IpfsGatewayClient::new(&config).unwrap();

    let document = client.fetch_json("QmMeta").await.unwrap();
    assert_eq!(document, json!({"name": "Widget"}));
    assert_eq!(client.primary_gateway(), Some("http://127.0.0.1:1/ipfs/"));
}

#[tokio::test]
async fn test_gateway_client_reports_exhaustion() {
    let config = IpfsConfig {
        gateways: vec!["http://127.0.0.1:1/ipfs/".to_string()],
        timeout_ms: 500,
        failure_retry_secs: 60,
    };
    let client = IpfsGatewayClient::new(&config).unwrap();

    let result = client.fetch_json("QmMeta").await;
    assert!(matches!(result, Err(IpfsError::Exhausted(_))));
}
