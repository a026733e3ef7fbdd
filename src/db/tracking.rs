//! Bus location history and latest positions.

use crate::{
    error::{DbContext, Result},
    models::{BusPosition, Coordinates},
};
use chrono::{DateTime, Utc};

impl super::Database {
    /// Appends a fix to the history and replaces the bus's latest position
    pub async fn record_location(
        &self,
        bus_pk: i64,
        lat: f64,
        lng: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;

        sqlx::query(
            "INSERT INTO locations (bus_id, latitude, longitude, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(bus_pk)
        .bind(lat)
        .bind(lng)
        .bind(now)
        .execute(&mut *tx)
        .await
        .db_context("Failed to record location")?;

        sqlx::query(
            "INSERT INTO bus_locations (bus_id, latitude, longitude, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (bus_id) DO UPDATE SET
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = excluded.updated_at",
        )
        .bind(bus_pk)
        .bind(lat)
        .bind(lng)
        .bind(now)
        .execute(&mut *tx)
        .await
        .db_context("Failed to update bus position")?;

        tx.commit().await.db_context("Failed to commit location")?;
        Ok(())
    }

    pub async fn latest_positions(&self) -> Result<Vec<BusPosition>> {
        sqlx::query_as::<_, BusPosition>(
            "SELECT b.bus_id AS id, l.latitude AS lat, l.longitude AS lng
             FROM bus_locations l
             JOIN buses b ON b.id = l.bus_id
             ORDER BY b.bus_id",
        )
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to load bus positions")
    }

    pub async fn latest_position(&self, bus_pk: i64) -> Result<Option<Coordinates>> {
        sqlx::query_as::<_, Coordinates>(
            "SELECT latitude AS lat, longitude AS lng FROM bus_locations WHERE bus_id = ?",
        )
        .bind(bus_pk)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load bus position")
    }

    pub async fn location_history_len(&self, bus_pk: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE bus_id = ?")
            .bind(bus_pk)
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to count locations")
    }
}
