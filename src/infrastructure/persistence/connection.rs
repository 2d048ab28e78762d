use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

use crate::config::AppConfig;
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

/// Owns the SeaORM connection shared by every repository
pub struct DbPool {
    connection: DatabaseConnection,
}

impl DbPool {
    /// Connect using the configured database URL
    pub async fn new(config: &AppConfig) -> Result<Self, DbError> {
        Self::connect(&config.database.url).await
    }

    /// Connect to an explicit URL
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        logging::log_database_connection_details(url);

        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(10)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let connection = Database::connect(options).await.map_err(|e| {
            logging::log_error(&format!("Failed to connect to database: {}", e));
            DbError::ConnectionError(format!("Failed to connect to database: {}", e))
        })?;

        logging::log_info("Database connection established successfully");
        Ok(DbPool { connection })
    }

    /// Returns the database connection
    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
