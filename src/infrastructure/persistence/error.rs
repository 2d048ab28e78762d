use std::error::Error;
use std::fmt;

/// Failure reading or writing the asset store, Postgres or in-memory
#[derive(Debug)]
pub enum DbError {
    /// Query or constraint failure reported by sea-orm
    SeaOrmError(sea_orm::DbErr),
    /// Postgres unreachable at startup
    ConnectionError(String),
    /// A write targeted a row that is not there
    MissingRow(String),
    /// Stored status, classification or kind string is not one the daemon knows
    MappingError(String),
    /// In-memory store lock was poisoned
    LockPoisoned(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::SeaOrmError(e) => write!(f, "Store error: {}", e),
            DbError::ConnectionError(msg) => {
                write!(f, "Could not connect to the asset store: {}", msg)
            }
            DbError::MissingRow(msg) => write!(f, "Missing row: {}", msg),
            DbError::MappingError(msg) => write!(f, "Unreadable stored value: {}", msg),
            DbError::LockPoisoned(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DbError::SeaOrmError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sea_orm::DbErr> for DbError {
    fn from(err: sea_orm::DbErr) -> Self {
        DbError::SeaOrmError(err)
    }
}
