use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ingestion status of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    NotStarted,
    Syncing,
    Synced,
    Error,
    Paused,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::NotStarted => "not_started",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
            SyncStatus::Paused => "paused",
        }
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// `error` and `paused` can be entered from anywhere; leaving either
    /// is only possible by resuming ingestion.
    pub fn can_transition_to(&self, next: SyncStatus) -> bool {
        use SyncStatus::*;

        if *self == next {
            return true;
        }

        match (self, next) {
            (_, Error) | (_, Paused) => true,
            (NotStarted, Syncing) => true,
            (Syncing, Synced) => true,
            (Synced, Syncing) => true,
            (Error, Syncing) => true,
            (Paused, Syncing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(SyncStatus::NotStarted),
            "syncing" => Ok(SyncStatus::Syncing),
            "synced" => Ok(SyncStatus::Synced),
            "error" => Ok(SyncStatus::Error),
            "paused" => Ok(SyncStatus::Paused),
            other => Err(format!("Unknown sync status: {}", other)),
        }
    }
}

/// Persisted progress record, one per stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub stream_id: String,
    /// Highest height whose block is fully processed and checkpointed
    pub current_block: u64,
    /// Node tip observed at the last iteration
    pub target_block: u64,
    pub status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Rolling average of seconds between consecutive blocks
    pub average_block_time: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl SyncState {
    /// Fresh record for a stream that has never run
    pub fn initial(stream_id: &str, start_height: u64) -> Self {
        Self {
            stream_id: stream_id.to_string(),
            current_block: start_height,
            target_block: start_height,
            status: SyncStatus::NotStarted,
            last_synced_at: None,
            last_error: None,
            average_block_time: None,
            updated_at: Utc::now(),
        }
    }
}

/// Partial update merged onto a `SyncState`.
///
/// `last_error` is doubly optional so an update can clear it.
#[derive(Debug, Clone, Default)]
pub struct SyncStateUpdate {
    pub current_block: Option<u64>,
    pub target_block: Option<u64>,
    pub status: Option<SyncStatus>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<Option<String>>,
    pub average_block_time: Option<f64>,
}

impl SyncStateUpdate {
    pub fn status(status: SyncStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_current_block(mut self, height: u64) -> Self {
        self.current_block = Some(height);
        self
    }

    pub fn with_target_block(mut self, height: u64) -> Self {
        self.target_block = Some(height);
        self
    }

    pub fn with_last_synced_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_synced_at = Some(at);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.last_error = Some(Some(message.into()));
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.last_error = Some(None);
        self
    }

    pub fn with_average_block_time(mut self, average: Option<f64>) -> Self {
        self.average_block_time = average;
        self
    }

    /// Apply every `Some` field onto `state`
    pub fn merge_into(self, state: &mut SyncState) {
        if let Some(height) = self.current_block {
            state.current_block = height;
        }
        if let Some(height) = self.target_block {
            state.target_block = height;
        }
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(at) = self.last_synced_at {
            state.last_synced_at = Some(at);
        }
        if let Some(error) = self.last_error {
            state.last_error = error;
        }
        if let Some(average) = self.average_block_time {
            state.average_block_time = Some(average);
        }
        state.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(SyncStatus::NotStarted.can_transition_to(SyncStatus::Syncing));
        assert!(SyncStatus::Syncing.can_transition_to(SyncStatus::Synced));
        assert!(SyncStatus::Synced.can_transition_to(SyncStatus::Syncing));
        assert!(SyncStatus::Error.can_transition_to(SyncStatus::Syncing));
        assert!(SyncStatus::Paused.can_transition_to(SyncStatus::Syncing));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!SyncStatus::NotStarted.can_transition_to(SyncStatus::Synced));
        assert!(!SyncStatus::Paused.can_transition_to(SyncStatus::Synced));
        assert!(!SyncStatus::Error.can_transition_to(SyncStatus::NotStarted));
    }

    #[test]
    fn test_error_and_paused_reachable_from_anywhere() {
        for status in [
            SyncStatus::NotStarted,
            SyncStatus::Syncing,
            SyncStatus::Synced,
            SyncStatus::Error,
            SyncStatus::Paused,
        ] {
            assert!(status.can_transition_to(SyncStatus::Error));
            assert!(status.can_transition_to(SyncStatus::Paused));
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        assert_eq!("not_started".parse::<SyncStatus>(), Ok(SyncStatus::NotStarted));
        assert_eq!(SyncStatus::Paused.to_string(), "paused");
        assert!("halted".parse::<SyncStatus>().is_err());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut state = SyncState::initial("stream", 10);
        state.last_error = Some("boom".to_string());

        SyncStateUpdate::status(SyncStatus::Syncing)
            .with_current_block(12)
            .merge_into(&mut state);

        assert_eq!(state.current_block, 12);
        assert_eq!(state.target_block, 10);
        assert_eq!(state.status, SyncStatus::Syncing);
        assert_eq!(state.last_error.as_deref(), Some("boom"));

        SyncStateUpdate::default().clear_error().merge_into(&mut state);
        assert!(state.last_error.is_none());
    }
}
