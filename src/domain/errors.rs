use std::error::Error;
use std::fmt;

use crate::domain::models::SyncStatus;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::rpc::RpcError;

/// Error type for per-transaction processing
#[derive(Debug)]
pub enum ProcessingError {
    /// Malformed or unresolvable transaction content; skipped, never retried
    DataError(String),
    /// Store failure while applying a transaction; retried at block level
    DbError(DbError),
}

impl ProcessingError {
    pub fn data(message: impl Into<String>) -> Self {
        ProcessingError::DataError(message.into())
    }

    /// Whether the failure is confined to the transaction itself
    pub fn is_data_error(&self) -> bool {
        matches!(self, ProcessingError::DataError(_))
    }
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::DataError(msg) => write!(f, "Data error: {}", msg),
            ProcessingError::DbError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl Error for ProcessingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProcessingError::DataError(_) => None,
            ProcessingError::DbError(e) => Some(e),
        }
    }
}

impl From<DbError> for ProcessingError {
    fn from(error: DbError) -> Self {
        ProcessingError::DbError(error)
    }
}

/// Error type for the ingestion loop
#[derive(Debug)]
pub enum SyncError {
    RpcError(RpcError),
    DbError(DbError),
    ProcessingError(ProcessingError),
    InvalidTransition { from: SyncStatus, to: SyncStatus },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::RpcError(e) => write!(f, "RPC error: {}", e),
            SyncError::DbError(e) => write!(f, "Database error: {}", e),
            SyncError::ProcessingError(e) => write!(f, "Processing error: {}", e),
            SyncError::InvalidTransition { from, to } => {
                write!(f, "Invalid sync status transition: {} -> {}", from, to)
            }
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SyncError::RpcError(e) => Some(e),
            SyncError::DbError(e) => Some(e),
            SyncError::ProcessingError(e) => Some(e),
            SyncError::InvalidTransition { .. } => None,
        }
    }
}

impl From<RpcError> for SyncError {
    fn from(error: RpcError) -> Self {
        SyncError::RpcError(error)
    }
}

impl From<DbError> for SyncError {
    fn from(error: DbError) -> Self {
        SyncError::DbError(error)
    }
}

impl From<ProcessingError> for SyncError {
    fn from(error: ProcessingError) -> Self {
        match error {
            ProcessingError::DbError(e) => SyncError::DbError(e),
            other => SyncError::ProcessingError(other),
        }
    }
}
