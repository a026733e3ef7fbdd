//! Database connection configuration.

use super::{env_or, env_string};

/// SQLite connection settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://busline.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_string("DATABASE_URL", &defaults.url),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
        }
    }

    /// Private in-memory database; a single connection keeps it alive for
    /// the lifetime of the pool.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}
