//! Booking lifecycle and payment order models.

use super::money::format_paise;
use chrono::{DateTime, NaiveDate, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Where a booking originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BookingChannel {
    /// Paid through the payment gateway
    Online,
    /// Issued on board against cash
    Conductor,
}

impl BookingChannel {
    /// Label used by conductor reports
    pub fn label(&self) -> &'static str {
        match self {
            BookingChannel::Online => "Online",
            BookingChannel::Conductor => "Manual",
        }
    }
}

/// Ticket state. `Issued` tickets can be scanned exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BookingStatus {
    Issued,
    Used,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub user_id: Option<i64>,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub schedule_id: Option<i64>,
    pub seats: i64,
    pub fare_paise: i64,
    pub channel: BookingChannel,
    pub status: BookingStatus,
    pub verified_by_conductor: bool,
    pub qr_payload: Option<String>,
    pub booking_time: DateTime<Utc>,
    pub booking_date: NaiveDate,
}

/// Values needed to insert a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<i64>,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub schedule_id: Option<i64>,
    pub seats: i64,
    pub fare_paise: i64,
    pub channel: BookingChannel,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct BookingView {
    pub id: i64,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub schedule_id: Option<i64>,
    pub seats: i64,
    pub fare: String,
    pub channel: BookingChannel,
    pub status: BookingStatus,
    pub verified_by_conductor: bool,
    pub booking_time: DateTime<Utc>,
    /// Signed payload to encode in the ticket QR code
    pub qr_payload: Option<String>,
}

impl From<&Booking> for BookingView {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            route_no: booking.route_no.clone(),
            source: booking.source.clone(),
            destination: booking.destination.clone(),
            schedule_id: booking.schedule_id,
            seats: booking.seats,
            fare: format_paise(booking.fare_paise),
            channel: booking.channel,
            status: booking.status,
            verified_by_conductor: booking.verified_by_conductor,
            booking_time: booking.booking_time,
            qr_payload: booking.qr_payload.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct BookTicketQuery {
    pub route_no: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Everything a checkout page needs before creating an order
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct BookTicketContext {
    pub route_no: Option<String>,
    pub from_stop: Option<String>,
    pub to_stop: Option<String>,
    pub base_fare: String,
    /// Per-seat quote when the stop pair is known
    pub fare_per_seat: Option<String>,
    pub currency: String,
    pub razorpay_key_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct CreateOrderRequest {
    pub route_no: String,
    pub from: String,
    pub to: String,
    pub seats: Option<i64>,
    pub schedule_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentOrderStatus {
    Created,
    Paid,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentOrder {
    pub order_id: String,
    pub user_id: Option<i64>,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub seats: i64,
    pub schedule_id: Option<i64>,
    pub amount_paise: i64,
    pub currency: String,
    pub receipt: String,
    pub status: PaymentOrderStatus,
    pub payment_id: Option<String>,
    pub booking_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Gateway order as returned to the checkout client
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct CreateOrderResponse {
    pub id: String,
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub key_id: String,
}

/// Checkout callback payload; accepts the gateway's field names
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct PaymentSuccessRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct PaymentSuccessResponse {
    pub message: String,
    pub booking_id: i64,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RecentBooking {
    pub route_no: String,
    pub from_stop: String,
    pub to_stop: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RecentBookingsResponse {
    pub recent_bookings: Vec<RecentBooking>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct BookingPage {
    pub items: Vec<BookingView>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}
