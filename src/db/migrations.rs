//! Database schema initialization.

use crate::error::{DbContext, Result};

impl super::Database {
    /// Applies the embedded schema. Statements are idempotent.
    pub(super) async fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        sqlx::raw_sql(schema_sql)
            .execute(&self.pool)
            .await
            .db_context("Failed to initialize database schema")?;

        tracing::debug!("Database schema initialized");
        Ok(())
    }
}
