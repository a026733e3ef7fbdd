//! Passenger booking flow handlers.

use crate::{
    models::{
        BookTicketContext, BookTicketQuery, BookingPage, BookingView, CreateOrderRequest,
        CreateOrderResponse, PageQuery, PaymentSuccessRequest, PaymentSuccessResponse,
        RecentBookingsResponse, Role,
    },
    services::{auth, booking},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result};
use paperclip::actix::{api_v2_operation, web};

/// Roles allowed to buy tickets online
const BUYERS: &[Role] = &[Role::Passenger, Role::Admin];

#[api_v2_operation(
    summary = "Booking Context",
    description = "Base fare, gateway key and, for a known stop pair, the per-seat fare",
    tags("Bookings"),
    responses((status = 200, description = "Checkout context", body = BookTicketContext))
)]
pub async fn book_ticket(
    state: web::Data<AppState>,
    query: web::Query<BookTicketQuery>,
) -> Result<web::Json<BookTicketContext>, Error> {
    Ok(web::Json(booking::book_ticket_context(&state, &query).await?))
}

/// Create a payment order
///
/// Prices the journey and opens an order with the payment gateway. The
/// booking itself is created once the payment is confirmed.
#[api_v2_operation(
    summary = "Create Order",
    description = "Price a journey and open a payment order",
    tags("Bookings"),
    responses(
        (status = 200, description = "Gateway order", body = CreateOrderResponse),
        (status = 400, description = "Invalid route, stops or seats"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Not enough seats on the departure"),
        (status = 429, description = "Too many requests"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn create_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<CreateOrderRequest>,
) -> Result<web::Json<CreateOrderResponse>, Error> {
    let principal = auth::authorize(&req, &state, BUYERS).await?;
    Ok(web::Json(
        booking::create_order(&req, &state, &principal, &payload).await?,
    ))
}

/// Confirm a payment
///
/// Verifies the gateway signature and issues the ticket. Confirming the
/// same order again returns the booking created the first time.
#[api_v2_operation(
    summary = "Payment Success",
    description = "Verify the checkout signature and issue the booking",
    tags("Bookings"),
    responses(
        (status = 200, description = "Booking confirmed", body = PaymentSuccessResponse),
        (status = 400, description = "Signature verification failed"),
        (status = 404, description = "Unknown order"),
        (status = 409, description = "Departure sold out")
    )
)]
pub async fn payment_success(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<PaymentSuccessRequest>,
) -> Result<web::Json<PaymentSuccessResponse>, Error> {
    let principal = auth::authorize(&req, &state, BUYERS).await?;
    Ok(web::Json(
        booking::confirm_payment(&req, &state, &principal, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Booking Confirmation",
    description = "Booking details with the signed QR payload",
    tags("Bookings"),
    responses(
        (status = 200, description = "Booking", body = BookingView),
        (status = 404, description = "Unknown booking or not the caller's")
    )
)]
pub async fn booking_confirmation(
    req: HttpRequest,
    state: web::Data<AppState>,
    booking_id: web::Path<i64>,
) -> Result<web::Json<BookingView>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(
        booking::booking_confirmation(&state, &principal, booking_id.into_inner()).await?,
    ))
}

#[api_v2_operation(
    summary = "My Bookings",
    description = "The caller's bookings, newest first",
    tags("Bookings"),
    responses(
        (status = 200, description = "Bookings"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_bookings(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<BookingView>>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(booking::my_bookings(&state, &principal).await?))
}

#[api_v2_operation(
    summary = "Recent Bookings",
    description = "The caller's three most recent journeys",
    tags("Bookings"),
    responses(
        (status = 200, description = "Recent journeys", body = RecentBookingsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn recent_bookings(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<RecentBookingsResponse>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(RecentBookingsResponse {
        recent_bookings: booking::recent_bookings(&state, &principal).await?,
    }))
}

#[api_v2_operation(
    summary = "All Bookings",
    tags("Admin"),
    responses(
        (status = 200, description = "One page of bookings", body = BookingPage),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_bookings(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<web::Json<BookingPage>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(booking::list_bookings(&state, query.page).await?))
}
