//! SQLite persistence.
//!
//! [`Database`] owns the connection pool; query methods are grouped by
//! concern in the submodules, each adding an `impl Database` block.

use crate::{
    config::DatabaseConfig,
    error::{DbContext, Result},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub mod accounts;
pub mod bookings;
pub mod conductors;
pub mod fleet;
pub mod migrations;
pub mod reports;
pub mod tracking;

/// Database connection pool and operations handler.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and initializes the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .db_context("Invalid database URL")?
            .foreign_keys(true)
            .create_if_missing(true);

        let pool_options = if config.is_in_memory() {
            // Every connection to :memory: is a distinct database
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .db_context("Failed to open database connection")?;

        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Cheap liveness probe for the health endpoint
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
