//! Conductor ticket scans.

use crate::{
    error::Result,
    models::{
        AuditEvent, AuditEventType, AuditOutcome, BookingStatus, Principal, VerifyTicketResponse,
        format_paise,
    },
    state::AppState,
};
use actix_web::HttpRequest;
use chrono::Utc;

const NOT_FOUND: &str = "Ticket not found";
const ALREADY_USED: &str = "Ticket already used";
const ACCEPTED: &str = "Ticket valid and now marked as used";

fn reject(
    req: &HttpRequest,
    state: &AppState,
    principal: &Principal,
    booking_id: Option<i64>,
    outcome: &str,
    message: &str,
) -> VerifyTicketResponse {
    state.metrics.record_ticket_scan(outcome);
    let mut event =
        AuditEvent::from_request(req, AuditEventType::TicketRejected, AuditOutcome::Failure)
            .with_user_id(Some(principal.username.clone()))
            .with_details(outcome);
    if let Some(id) = booking_id {
        event = event.with_booking(id);
    }
    event.log();
    VerifyTicketResponse::rejected(message)
}

/// Validates a scanned payload and consumes the ticket.
///
/// Only authentic payloads for existing bookings are considered. The
/// `issued -> used` transition is a conditional update, so of two concurrent
/// scans exactly one succeeds. Every scan of a known booking is logged.
pub async fn verify_ticket(
    req: &HttpRequest,
    state: &AppState,
    principal: &Principal,
    conductor_id: i64,
    data: Option<&str>,
    location: Option<&str>,
) -> Result<VerifyTicketResponse> {
    state.limiter.check_request(req, "verify")?;

    let Some(booking_id) = data.and_then(|payload| state.tickets.parse(payload)) else {
        return Ok(reject(req, state, principal, None, "not_found", NOT_FOUND));
    };
    let Some(booking) = state.db.find_booking(booking_id).await? else {
        return Ok(reject(req, state, principal, Some(booking_id), "not_found", NOT_FOUND));
    };

    let location = location.map(str::trim).filter(|l| !l.is_empty());
    let now = Utc::now();

    let accepted =
        booking.status == BookingStatus::Issued && state.db.mark_ticket_used(booking.id).await?;
    state
        .db
        .record_validation(Some(conductor_id), booking.id, accepted, location, now)
        .await?;

    if !accepted {
        return Ok(reject(req, state, principal, Some(booking.id), "already_used", ALREADY_USED));
    }

    state.metrics.record_ticket_scan("valid");
    AuditEvent::from_request(req, AuditEventType::TicketValidated, AuditOutcome::Success)
        .with_user_id(Some(principal.username.clone()))
        .with_booking(booking.id)
        .log();

    Ok(VerifyTicketResponse {
        valid: true,
        booking_id: Some(booking.id),
        route: Some(booking.route_no),
        source: Some(booking.source),
        destination: Some(booking.destination),
        seats: Some(booking.seats),
        fare: Some(format_paise(booking.fare_paise)),
        message: ACCEPTED.to_string(),
    })
}
