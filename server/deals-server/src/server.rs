use anyhow::Result;
use deals_storage::{DatabasePool, TaskRepository};
use sqlx::SqlitePool;
use std::path::PathBuf;

use crate::media::MediaStore;
use crate::templates::TemplateEngine;

/// Main Deals server state
#[derive(Clone)]
pub struct DealsServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Database connection pool
    pub db_pool: SqlitePool,
    /// Task repository
    pub tasks: TaskRepository,
    /// Template engine
    pub templates: TemplateEngine,
    /// Uploaded media storage
    pub media: MediaStore,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Database connection string
    pub database_url: String,
    /// Directory uploaded media is written to
    pub media_root: PathBuf,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Deals".to_string(),
            database_url: "sqlite://deals.db".to_string(),
            media_root: PathBuf::from("./media"),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl DealsServer {
    /// Create a new Deals server instance, connecting to the configured
    /// database and applying the schema.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let db = DatabasePool::new(&config.database_url).await?;
        db.init_schema().await?;
        Self::new_with_pool_and_config(db.pool().clone(), config)
    }

    /// Create a server instance over an existing database pool.
    /// This is useful for testing.
    pub fn new_with_pool(db_pool: SqlitePool) -> Result<Self> {
        Self::new_with_pool_and_config(db_pool, ServerConfig::default())
    }

    /// Create a server instance over an existing pool and configuration.
    /// The pool is expected to have the schema applied already.
    pub fn new_with_pool_and_config(db_pool: SqlitePool, config: ServerConfig) -> Result<Self> {
        let tasks = TaskRepository::new(db_pool.clone());
        let templates = TemplateEngine::new()?;
        let media = MediaStore::new(&config.media_root);

        Ok(Self {
            config,
            db_pool,
            tasks,
            templates,
            media,
        })
    }

    /// Get server configuration
    pub fn get_config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for DealsServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealsServer")
            .field("config", &self.config)
            .finish()
    }
}
