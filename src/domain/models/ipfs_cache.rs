use chrono::{DateTime, Utc};
use serde_json::Value;

/// Outcome of the last fetch for a hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Success,
    Failed,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Success => "success",
            CacheStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value == "success" {
            CacheStatus::Success
        } else {
            CacheStatus::Failed
        }
    }
}

/// Non-authoritative metadata cache row
#[derive(Debug, Clone, PartialEq)]
pub struct IpfsCacheEntry {
    pub hash: String,
    pub metadata: Option<Value>,
    pub status: CacheStatus,
    pub access_count: u64,
    pub fetched_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl IpfsCacheEntry {
    pub fn success(hash: &str, metadata: Value) -> Self {
        Self {
            hash: hash.to_string(),
            metadata: Some(metadata),
            status: CacheStatus::Success,
            access_count: 1,
            fetched_at: Utc::now(),
            last_accessed_at: Some(Utc::now()),
        }
    }

    pub fn failed(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            metadata: None,
            status: CacheStatus::Failed,
            access_count: 0,
            fetched_at: Utc::now(),
            last_accessed_at: None,
        }
    }
}
