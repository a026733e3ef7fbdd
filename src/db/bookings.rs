//! Bookings, payment orders, cash bookings and ticket validation logs.

use crate::{
    error::{AppError, DbContext, Result},
    models::{Booking, NewBooking, PaymentOrder},
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};

const BOOKING_COLUMNS: &str = "id, user_id, route_no, source, destination, schedule_id, seats,
    fare_paise, channel, status, verified_by_conductor, qr_payload, booking_time, booking_date";

const ORDER_COLUMNS: &str = "order_id, user_id, route_no, source, destination, seats, schedule_id,
    amount_paise, currency, receipt, status, payment_id, booking_id, created_at";

/// Outcome of settling a payment order
#[derive(Debug)]
pub struct SettledOrder {
    pub booking: Booking,
    /// `false` when the order had already been settled by an earlier callback
    pub newly_created: bool,
}

impl super::Database {
    /// Takes seats from a schedule; fails with `Conflict` when not enough
    /// remain.
    async fn reserve_seats(
        tx: &mut Transaction<'_, Sqlite>,
        schedule_id: i64,
        seats: i64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE schedules SET available_seats = available_seats - ?
             WHERE id = ? AND available_seats >= ?",
        )
        .bind(seats)
        .bind(schedule_id)
        .bind(seats)
        .execute(&mut **tx)
        .await
        .db_context("Failed to reserve seats")?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Not enough seats available on schedule {schedule_id}"
            )));
        }
        Ok(())
    }

    async fn insert_booking(
        tx: &mut Transaction<'_, Sqlite>,
        booking: &NewBooking,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        if let Some(schedule_id) = booking.schedule_id {
            Self::reserve_seats(tx, schedule_id, booking.seats).await?;
        }

        let result = sqlx::query(
            "INSERT INTO bookings (user_id, route_no, source, destination, schedule_id, seats,
                fare_paise, channel, status, verified_by_conductor, booking_time, booking_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'issued', 0, ?, ?)",
        )
        .bind(booking.user_id)
        .bind(&booking.route_no)
        .bind(&booking.source)
        .bind(&booking.destination)
        .bind(booking.schedule_id)
        .bind(booking.seats)
        .bind(booking.fare_paise)
        .bind(booking.channel)
        .bind(now)
        .bind(now.date_naive())
        .execute(&mut **tx)
        .await
        .db_context("Failed to create booking")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn create_payment_order(&self, order: &PaymentOrder) -> Result<()> {
        sqlx::query(
            "INSERT INTO payment_orders (order_id, user_id, route_no, source, destination, seats,
                schedule_id, amount_paise, currency, receipt, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.order_id)
        .bind(order.user_id)
        .bind(&order.route_no)
        .bind(&order.source)
        .bind(&order.destination)
        .bind(order.seats)
        .bind(order.schedule_id)
        .bind(order.amount_paise)
        .bind(&order.currency)
        .bind(&order.receipt)
        .bind(order.status)
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .db_context("Failed to store payment order")?;
        Ok(())
    }

    pub async fn find_payment_order(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        sqlx::query_as::<_, PaymentOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM payment_orders WHERE order_id = ?"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load payment order")
    }

    /// Marks an order paid and creates its booking in one transaction.
    /// Settling an already-paid order returns the booking created the first
    /// time.
    pub async fn settle_payment_order(
        &self,
        order_id: &str,
        payment_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SettledOrder> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;

        let order = sqlx::query_as::<_, PaymentOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM payment_orders WHERE order_id = ?"
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await
        .db_context("Failed to load payment order")?
        .ok_or_else(|| AppError::not_found("Payment order", order_id))?;

        if let Some(booking_id) = order.booking_id {
            tx.rollback().await.db_context("Failed to roll back")?;
            return Ok(SettledOrder {
                booking: self.get_booking(booking_id).await?,
                newly_created: false,
            });
        }

        let booking_id = Self::insert_booking(
            &mut tx,
            &NewBooking {
                user_id: order.user_id,
                route_no: order.route_no.clone(),
                source: order.source.clone(),
                destination: order.destination.clone(),
                schedule_id: order.schedule_id,
                seats: order.seats,
                fare_paise: order.amount_paise,
                channel: crate::models::BookingChannel::Online,
            },
            now,
        )
        .await?;

        let updated = sqlx::query(
            "UPDATE payment_orders SET status = 'paid', payment_id = ?, booking_id = ?
             WHERE order_id = ? AND status = 'created'",
        )
        .bind(payment_id)
        .bind(booking_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .db_context("Failed to settle payment order")?;

        if updated.rows_affected() != 1 {
            return Err(AppError::Conflict(format!(
                "Payment order {order_id} was settled concurrently"
            )));
        }

        tx.commit().await.db_context("Failed to commit booking")?;

        Ok(SettledOrder {
            booking: self.get_booking(booking_id).await?,
            newly_created: true,
        })
    }

    /// Creates a conductor-issued booking together with its cash record
    pub async fn create_cash_booking(
        &self,
        booking: &NewBooking,
        conductor_id: i64,
        cash_received_paise: i64,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;
        let booking_id = Self::insert_booking(&mut tx, booking, now).await?;

        sqlx::query(
            "INSERT INTO cash_bookings (conductor_id, booking_id, cash_received_paise, issued_at,
                issued_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(conductor_id)
        .bind(booking_id)
        .bind(cash_received_paise)
        .bind(now)
        .bind(now.date_naive())
        .execute(&mut *tx)
        .await
        .db_context("Failed to record cash booking")?;

        tx.commit().await.db_context("Failed to commit cash booking")?;
        self.get_booking(booking_id).await
    }

    pub async fn find_booking(&self, booking_id: i64) -> Result<Option<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load booking")
    }

    pub async fn get_booking(&self, booking_id: i64) -> Result<Booking> {
        self.find_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking", booking_id))
    }

    /// Stores the QR payload unless one was already stored; returns the
    /// payload in effect.
    pub async fn ensure_qr_payload(&self, booking_id: i64, payload: &str) -> Result<String> {
        sqlx::query("UPDATE bookings SET qr_payload = ? WHERE id = ? AND qr_payload IS NULL")
            .bind(payload)
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .db_context("Failed to store QR payload")?;

        let stored =
            sqlx::query_scalar::<_, Option<String>>("SELECT qr_payload FROM bookings WHERE id = ?")
                .bind(booking_id)
                .fetch_optional(&self.pool)
                .await
                .db_context("Failed to load QR payload")?
                .flatten();

        stored.ok_or_else(|| AppError::not_found("Booking", booking_id))
    }

    /// Newest first; `limit` of `None` returns everything
    pub async fn bookings_for_user(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?
             ORDER BY booking_time DESC, id DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to load bookings")
    }

    pub async fn list_bookings(&self, limit: i64, offset: i64) -> Result<(Vec<Booking>, i64)> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             ORDER BY booking_time DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to list bookings")?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to count bookings")?;

        Ok((bookings, total))
    }

    /// Single-use transition `issued -> used`. Returns `false` when the
    /// ticket was already used, including when a concurrent scan won.
    pub async fn mark_ticket_used(&self, booking_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'used', verified_by_conductor = 1
             WHERE id = ? AND status = 'issued'",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .db_context("Failed to mark ticket used")?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn record_validation(
        &self,
        conductor_id: Option<i64>,
        booking_id: i64,
        is_valid: bool,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO validation_logs (conductor_id, booking_id, validated_at, validated_date,
                is_valid, location)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(conductor_id)
        .bind(booking_id)
        .bind(now)
        .bind(now.date_naive())
        .bind(is_valid)
        .bind(location)
        .execute(&self.pool)
        .await
        .db_context("Failed to record ticket validation")?;
        Ok(())
    }

    pub async fn validation_count(&self, booking_id: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM validation_logs WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to count validations")
    }

    /// Bookings of a day that count towards conductor takings: every manual
    /// booking plus online bookings a conductor has verified. Newest first.
    pub async fn counted_bookings_on(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE booking_date = ?
               AND (channel = 'conductor' OR (channel = 'online' AND verified_by_conductor = 1))
             ORDER BY booking_time DESC, id DESC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to load bookings for date")
    }
}
