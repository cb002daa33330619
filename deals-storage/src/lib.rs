//! SQLite storage layer for the Deals web application.
//!
//! Provides the connection pool wrapper, schema bootstrap and the
//! [`TaskRepository`] used by the HTTP server. The schema is applied
//! idempotently at startup so a fresh database file is usable without a
//! separate migration step.

pub mod error;
pub mod task;

pub use error::{StorageError, StorageResult};
pub use task::{NewTask, Task, TaskRepository};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Create a new database pool from a connection string such as
    /// `sqlite://deals.db`. The database file is created when missing.
    pub async fn new(database_url: &str) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Create a pool backed by an in-memory database.
    ///
    /// A single connection is held open for the lifetime of the pool;
    /// SQLite drops an in-memory database as soon as its last connection
    /// closes, so the pool must never cycle connections.
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the schema. Safe to call on every startup.
    pub async fn init_schema(&self) -> StorageResult<()> {
        task::init_schema(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationError(e.to_string()))?;
        info!("Database schema applied");
        Ok(())
    }

    /// Check if the pool is healthy.
    pub async fn is_healthy(&self) -> bool {
        pool_is_healthy(&self.pool).await
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

/// Run a trivial query to confirm the pool can serve requests.
pub async fn pool_is_healthy(pool: &SqlitePool) -> bool {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_pool_is_healthy() {
        let db = DatabasePool::new_in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        assert!(db.is_healthy().await);
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let db = DatabasePool::new_in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        db.init_schema().await.unwrap();
    }
}
