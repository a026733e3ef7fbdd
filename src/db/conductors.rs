//! Trips and daily reports for conductors.

use crate::{
    error::{AppError, DbContext, Result},
    models::{ActiveTrip, DailyReport},
};
use chrono::{DateTime, NaiveDate, Utc};

const TRIP_SELECT: &str = "SELECT t.id, t.conductor_id, t.bus_id, b.bus_id AS bus_code,
        t.schedule_id, t.started_at, t.ended_at, t.is_active
     FROM active_trips t
     JOIN buses b ON b.id = t.bus_id";

/// Takings of one conductor on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotals {
    pub cash_paise: i64,
    pub passengers: i64,
}

impl super::Database {
    /// Opens a trip and assigns the bus (and schedule) to the conductor.
    /// A conductor can have one active trip at a time.
    pub async fn start_trip(
        &self,
        conductor_id: i64,
        bus_id: i64,
        schedule_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ActiveTrip> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM active_trips WHERE conductor_id = ? AND is_active = 1",
        )
        .bind(conductor_id)
        .fetch_one(&mut *tx)
        .await
        .db_context("Failed to check active trips")?;

        if active > 0 {
            return Err(AppError::Conflict(
                "An active trip is already in progress; end it first".to_string(),
            ));
        }

        let result = sqlx::query(
            "INSERT INTO active_trips (conductor_id, bus_id, schedule_id, started_at, is_active)
             VALUES (?, ?, ?, ?, 1)",
        )
        .bind(conductor_id)
        .bind(bus_id)
        .bind(schedule_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .db_context("Failed to start trip")?;

        sqlx::query(
            "UPDATE conductor_profiles SET assigned_bus_id = ?, assigned_schedule_id = ?
             WHERE id = ?",
        )
        .bind(bus_id)
        .bind(schedule_id)
        .bind(conductor_id)
        .execute(&mut *tx)
        .await
        .db_context("Failed to assign bus")?;

        tx.commit().await.db_context("Failed to commit trip")?;

        let trip_id = result.last_insert_rowid();
        self.find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trip", trip_id))
    }

    /// Closes the conductor's active trip, if any
    pub async fn end_trip(&self, conductor_id: i64, now: DateTime<Utc>) -> Result<Option<ActiveTrip>> {
        let Some(trip) = self.active_trip(conductor_id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE active_trips SET is_active = 0, ended_at = ? WHERE id = ?")
            .bind(now)
            .bind(trip.id)
            .execute(&self.pool)
            .await
            .db_context("Failed to end trip")?;

        self.find_trip(trip.id).await
    }

    pub async fn active_trip(&self, conductor_id: i64) -> Result<Option<ActiveTrip>> {
        sqlx::query_as::<_, ActiveTrip>(&format!(
            "{TRIP_SELECT} WHERE t.conductor_id = ? AND t.is_active = 1"
        ))
        .bind(conductor_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load active trip")
    }

    async fn find_trip(&self, trip_id: i64) -> Result<Option<ActiveTrip>> {
        sqlx::query_as::<_, ActiveTrip>(&format!("{TRIP_SELECT} WHERE t.id = ?"))
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to load trip")
    }

    /// Fares of the conductor's cash bookings, and passengers carried: seats
    /// sold on board plus seats on tickets the conductor accepted.
    pub async fn daily_totals(&self, conductor_id: i64, date: NaiveDate) -> Result<DailyTotals> {
        let (cash_paise, manual_seats): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(b.fare_paise), 0), COALESCE(SUM(b.seats), 0)
             FROM cash_bookings c
             JOIN bookings b ON b.id = c.booking_id
             WHERE c.conductor_id = ? AND c.issued_date = ?",
        )
        .bind(conductor_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .db_context("Failed to total cash bookings")?;

        let validated_seats: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(b.seats), 0)
             FROM bookings b
             WHERE b.channel = 'online' AND b.id IN (
                SELECT booking_id FROM validation_logs
                WHERE conductor_id = ? AND validated_date = ? AND is_valid = 1
             )",
        )
        .bind(conductor_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .db_context("Failed to total validated tickets")?;

        Ok(DailyTotals {
            cash_paise,
            passengers: manual_seats + validated_seats,
        })
    }

    pub async fn upsert_daily_report(
        &self,
        conductor_id: i64,
        date: NaiveDate,
        totals: DailyTotals,
    ) -> Result<DailyReport> {
        sqlx::query(
            "INSERT INTO daily_reports (conductor_id, report_date, total_cash_paise, total_passengers)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (conductor_id, report_date) DO UPDATE SET
                total_cash_paise = excluded.total_cash_paise,
                total_passengers = excluded.total_passengers",
        )
        .bind(conductor_id)
        .bind(date)
        .bind(totals.cash_paise)
        .bind(totals.passengers)
        .execute(&self.pool)
        .await
        .db_context("Failed to store daily report")?;

        sqlx::query_as::<_, DailyReport>(
            "SELECT id, conductor_id, report_date, total_cash_paise, total_passengers
             FROM daily_reports WHERE conductor_id = ? AND report_date = ?",
        )
        .bind(conductor_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .db_context("Failed to load daily report")
    }
}
