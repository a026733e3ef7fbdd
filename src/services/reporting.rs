//! Conductor dashboards: today's tickets, their aggregates and the daily
//! cash report.

use crate::{
    db::conductors::DailyTotals,
    error::{AppError, Result},
    models::{
        ActiveTrip, Booking, BookingAnalysis, BookingChannel, DailyReportView, TodaysBooking,
        format_paise,
    },
    state::AppState,
};
use chrono::{NaiveDate, Utc};

/// Days are UTC calendar days
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn analyse(bookings: &[Booking], date: NaiveDate) -> BookingAnalysis {
    let manual_count = bookings
        .iter()
        .filter(|b| b.channel == BookingChannel::Conductor)
        .count() as i64;

    BookingAnalysis {
        total_bookings: bookings.len() as i64,
        total_seats: bookings.iter().map(|b| b.seats).sum(),
        total_fare: format_paise(bookings.iter().map(|b| b.fare_paise).sum()),
        online_count: bookings.len() as i64 - manual_count,
        manual_count,
        date,
    }
}

/// Manual tickets plus verified online tickets of today, newest first
pub async fn todays_bookings(state: &AppState) -> Result<Vec<TodaysBooking>> {
    let bookings = state.db.counted_bookings_on(today()).await?;
    Ok(bookings
        .into_iter()
        .map(|b| TodaysBooking {
            id: b.id,
            booking_type: b.channel.label().to_string(),
            time: b.booking_time.format("%H:%M:%S").to_string(),
            fare: format_paise(b.fare_paise),
            route: b.route_no,
            source: b.source,
            destination: b.destination,
            seats: b.seats,
        })
        .collect())
}

pub async fn booking_analysis(state: &AppState) -> Result<BookingAnalysis> {
    let date = today();
    let bookings = state.db.counted_bookings_on(date).await?;
    Ok(analyse(&bookings, date))
}

/// Recomputes and stores today's report for one conductor
pub async fn daily_report(state: &AppState, conductor_id: i64) -> Result<DailyReportView> {
    let date = today();
    let conductor = state.db.get_conductor(conductor_id).await?;
    let totals: DailyTotals = state.db.daily_totals(conductor_id, date).await?;
    let report = state
        .db
        .upsert_daily_report(conductor_id, date, totals)
        .await?;

    tracing::info!(
        employee_id = %conductor.employee_id,
        date = %date,
        cash_paise = report.total_cash_paise,
        passengers = report.total_passengers,
        "Daily report recorded"
    );

    Ok(DailyReportView {
        employee_id: conductor.employee_id,
        date: report.report_date,
        total_cash_collected: format_paise(report.total_cash_paise),
        total_passengers: report.total_passengers,
    })
}

/// Starts a trip on a bus identified by its fleet code
pub async fn start_trip(
    state: &AppState,
    conductor_id: i64,
    bus_code: &str,
    schedule_id: Option<i64>,
) -> Result<ActiveTrip> {
    let bus = state.db.require_bus(bus_code.trim()).await?;
    if let Some(schedule_id) = schedule_id {
        let schedule = state
            .db
            .find_schedule(schedule_id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule", schedule_id))?;
        if schedule.bus_code != bus.bus_id {
            return Err(AppError::validation(
                "schedule_id",
                format!("schedule is not operated by bus {}", bus.bus_id),
            ));
        }
    }
    state
        .db
        .start_trip(conductor_id, bus.id, schedule_id, Utc::now())
        .await
}

/// Closes the conductor's active trip
pub async fn end_trip(state: &AppState, conductor_id: i64) -> Result<ActiveTrip> {
    state
        .db
        .end_trip(conductor_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::not_found("Active trip", conductor_id))
}
