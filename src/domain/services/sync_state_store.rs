//! Persisted progress record for one ingestion stream.
//!
//! The store keeps the last saved record in memory and validates every status
//! change against the state machine before it is written.

use std::sync::Arc;

use crate::domain::errors::SyncError;
use crate::domain::models::{SyncState, SyncStateUpdate, SyncStatus};
use crate::infrastructure::persistence::repositories::SyncStateRepository;
use crate::utils::logging;

pub struct SyncStateStore {
    repository: Arc<dyn SyncStateRepository>,
    stream_id: String,
    start_height: u64,
    state: Option<SyncState>,
}

impl SyncStateStore {
    pub fn new(
        repository: Arc<dyn SyncStateRepository>,
        stream_id: impl Into<String>,
        start_height: u64,
    ) -> Self {
        Self {
            repository,
            stream_id: stream_id.into(),
            start_height,
            state: None,
        }
    }

    /// Last record loaded or written, if any
    pub fn current(&self) -> Option<&SyncState> {
        self.state.as_ref()
    }

    /// Read the stream's record, creating the default one on first run
    pub async fn load(&mut self) -> Result<SyncState, SyncError> {
        let state = match self.repository.find(&self.stream_id).await? {
            Some(state) => state,
            None => {
                let state = SyncState::initial(&self.stream_id, self.start_height);
                self.repository.save(&state).await?;
                logging::log_info(&format!(
                    "[{}] Created sync state starting after height {}",
                    self.stream_id, self.start_height
                ));
                state
            }
        };

        self.state = Some(state.clone());
        Ok(state)
    }

    /// Merge `update` onto the record and persist it
    pub async fn update(&mut self, update: SyncStateUpdate) -> Result<SyncState, SyncError> {
        let mut state = match &self.state {
            Some(state) => state.clone(),
            None => self.load().await?,
        };

        if let Some(next) = update.status {
            if !state.status.can_transition_to(next) {
                return Err(SyncError::InvalidTransition {
                    from: state.status,
                    to: next,
                });
            }
        }

        update.merge_into(&mut state);
        self.repository.save(&state).await?;
        self.state = Some(state.clone());
        Ok(state)
    }

    pub async fn set_status(&mut self, status: SyncStatus) -> Result<SyncState, SyncError> {
        self.update(SyncStateUpdate::status(status)).await
    }

    /// Persist `status=error` with a message, swallowing any store failure so the
    /// original error stays the one reported
    pub async fn record_error(&mut self, message: &str) {
        let update = SyncStateUpdate::status(SyncStatus::Error).with_error(message);
        if let Err(e) = self.update(update).await {
            logging::log_error(&format!(
                "[{}] Could not persist error state: {}",
                self.stream_id, e
            ));
        }
    }
}
