//! Conductor profiles, ticket validation and trip models.

use super::booking::BookingView;
use chrono::{DateTime, NaiveDate, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConductorProfile {
    pub id: i64,
    pub user_id: i64,
    pub employee_id: String,
    pub contact_number: Option<String>,
    pub license_number: Option<String>,
    pub assigned_bus_id: Option<i64>,
    pub assigned_schedule_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ManualBookingRequest {
    pub route_no: String,
    pub from_stop: String,
    pub to_stop: String,
    pub seats: Option<i64>,
    /// Cash handed over, major units; defaults to the exact fare
    pub cash_received: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ManualBookingResponse {
    pub booking: BookingView,
    pub cash_received: String,
    pub change_due: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VerifyTicketQuery {
    /// Scanned QR payload
    pub data: Option<String>,
    /// Optional GPS fix or stop name recorded with the scan
    pub location: Option<String>,
}

/// Scan result. Booking fields are present only for accepted tickets.
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VerifyTicketResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<String>,
    pub message: String,
}

impl VerifyTicketResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            booking_id: None,
            route: None,
            source: None,
            destination: None,
            seats: None,
            fare: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ValidationLog {
    pub id: i64,
    pub conductor_id: Option<i64>,
    pub booking_id: i64,
    pub validated_at: DateTime<Utc>,
    pub is_valid: bool,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct TodaysBooking {
    pub id: i64,
    pub route: String,
    pub source: String,
    pub destination: String,
    pub seats: i64,
    pub fare: String,
    #[serde(rename = "type")]
    pub booking_type: String,
    /// "HH:MM:SS"
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct TodaysBookingsResponse {
    pub bookings: Vec<TodaysBooking>,
}

/// Aggregates over manual tickets and verified online tickets of one day
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct BookingAnalysis {
    pub total_bookings: i64,
    pub total_seats: i64,
    pub total_fare: String,
    pub online_count: i64,
    pub manual_count: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct StartTripRequest {
    pub bus_id: String,
    pub schedule_id: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveTrip {
    pub id: i64,
    pub conductor_id: i64,
    pub bus_id: i64,
    pub bus_code: String,
    pub schedule_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct TripView {
    pub id: i64,
    pub bus_id: String,
    pub schedule_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<&ActiveTrip> for TripView {
    fn from(trip: &ActiveTrip) -> Self {
        Self {
            id: trip.id,
            bus_id: trip.bus_code.clone(),
            schedule_id: trip.schedule_id,
            started_at: trip.started_at,
            ended_at: trip.ended_at,
            is_active: trip.is_active,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyReport {
    pub id: i64,
    pub conductor_id: i64,
    pub report_date: NaiveDate,
    pub total_cash_paise: i64,
    pub total_passengers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyReportView {
    pub employee_id: String,
    pub date: NaiveDate,
    pub total_cash_collected: String,
    pub total_passengers: i64,
}
