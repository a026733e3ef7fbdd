//! Conductor operation handlers: ticket scans, cash sales, trips and
//! daily reports.

use crate::{
    models::{
        BookingAnalysis, BookingView, DailyReportView, ManualBookingRequest,
        ManualBookingResponse, StartTripRequest, TodaysBookingsResponse, TripView,
        VerifyTicketQuery, VerifyTicketResponse,
    },
    services::{auth, booking, reporting, validation},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result};
use paperclip::actix::{api_v2_operation, web};

/// Verify a scanned ticket
///
/// Accepts a ticket exactly once. Forged, unknown and reused tickets are
/// answered with `valid: false` and a message rather than an error status.
#[api_v2_operation(
    summary = "Verify Ticket",
    description = "Validate a scanned QR payload and mark the ticket as used",
    tags("Conductor"),
    responses(
        (status = 200, description = "Scan result", body = VerifyTicketResponse),
        (status = 403, description = "Not a conductor"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn verify_ticket(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<VerifyTicketQuery>,
) -> Result<web::Json<VerifyTicketResponse>, Error> {
    let (principal, conductor_id) = auth::authorize_conductor(&req, &state).await?;
    let result = validation::verify_ticket(
        &req,
        &state,
        &principal,
        conductor_id,
        query.data.as_deref(),
        query.location.as_deref(),
    )
    .await?;
    Ok(web::Json(result))
}

#[api_v2_operation(
    summary = "Manual Booking",
    description = "Issue a ticket against cash on board",
    tags("Conductor"),
    responses(
        (status = 200, description = "Ticket issued", body = ManualBookingResponse),
        (status = 400, description = "Unknown stop pair or insufficient cash"),
        (status = 403, description = "Not a conductor")
    )
)]
pub async fn manual_booking(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ManualBookingRequest>,
) -> Result<web::Json<ManualBookingResponse>, Error> {
    let (principal, conductor_id) = auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(
        booking::manual_booking(&req, &state, &principal, conductor_id, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Ticket Success",
    description = "Receipt of a ticket sold on board",
    tags("Conductor"),
    responses(
        (status = 200, description = "Booking", body = BookingView),
        (status = 404, description = "Unknown booking")
    )
)]
pub async fn ticket_success(
    req: HttpRequest,
    state: web::Data<AppState>,
    booking_id: web::Path<i64>,
) -> Result<web::Json<BookingView>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(
        booking::ticket_success(&state, booking_id.into_inner()).await?,
    ))
}

#[api_v2_operation(
    summary = "Today's Bookings",
    description = "Manual tickets and verified online tickets of today, newest first",
    tags("Conductor"),
    responses((status = 200, description = "Bookings", body = TodaysBookingsResponse))
)]
pub async fn todays_bookings(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<TodaysBookingsResponse>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(TodaysBookingsResponse {
        bookings: reporting::todays_bookings(&state).await?,
    }))
}

#[api_v2_operation(
    summary = "Booking Analysis",
    description = "Totals over today's counted bookings",
    tags("Conductor"),
    responses((status = 200, description = "Aggregates", body = BookingAnalysis))
)]
pub async fn booking_analysis(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<BookingAnalysis>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(reporting::booking_analysis(&state).await?))
}

#[api_v2_operation(
    summary = "Start Trip",
    description = "Start a trip on a bus; a conductor runs one trip at a time",
    tags("Conductor"),
    responses(
        (status = 200, description = "Trip started", body = TripView),
        (status = 404, description = "Unknown bus or schedule"),
        (status = 409, description = "A trip is already active")
    )
)]
pub async fn start_trip(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<StartTripRequest>,
) -> Result<web::Json<TripView>, Error> {
    let (_, conductor_id) = auth::authorize_conductor(&req, &state).await?;
    let trip =
        reporting::start_trip(&state, conductor_id, &payload.bus_id, payload.schedule_id).await?;
    Ok(web::Json(TripView::from(&trip)))
}

#[api_v2_operation(
    summary = "End Trip",
    tags("Conductor"),
    responses(
        (status = 200, description = "Trip closed", body = TripView),
        (status = 404, description = "No active trip")
    )
)]
pub async fn end_trip(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<TripView>, Error> {
    let (_, conductor_id) = auth::authorize_conductor(&req, &state).await?;
    let trip = reporting::end_trip(&state, conductor_id).await?;
    Ok(web::Json(TripView::from(&trip)))
}

#[api_v2_operation(
    summary = "Daily Report",
    description = "Recompute and store today's cash and passenger totals for the caller",
    tags("Conductor"),
    responses((status = 200, description = "Report", body = DailyReportView))
)]
pub async fn daily_report(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<DailyReportView>, Error> {
    let (_, conductor_id) = auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(reporting::daily_report(&state, conductor_id).await?))
}
