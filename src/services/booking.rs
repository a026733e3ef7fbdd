//! Booking lifecycle: quotes, gateway orders, payment confirmation and
//! conductor cash sales.

use crate::{
    error::{AppError, Result},
    models::{
        AuditEvent, AuditEventType, AuditOutcome, BookTicketContext, BookTicketQuery, Booking,
        BookingChannel, BookingPage, BookingView, CreateOrderRequest, CreateOrderResponse,
        ManualBookingRequest, ManualBookingResponse, NewBooking, PaymentOrder, PaymentOrderStatus,
        PaymentSuccessRequest, PaymentSuccessResponse, Principal, REPORTS_PER_PAGE, RecentBooking,
        Role, format_paise, paise_from_amount,
    },
    services::{fare::FareQuote, payment::OrderRequest, reports},
    state::AppState,
};
use actix_web::HttpRequest;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Bookings shown by the recent-bookings widget
const RECENT_BOOKINGS: i64 = 3;

/// Prices a journey on a route
async fn quote_journey(
    state: &AppState,
    route_no: &str,
    from: &str,
    to: &str,
    seats: i64,
) -> Result<FareQuote> {
    let route = state.db.require_route(route_no.trim()).await?;
    let stops = state.db.route_stops(route.id).await?;
    state.fares.quote(&stops, from, to, seats)
}

pub async fn book_ticket_context(
    state: &AppState,
    query: &BookTicketQuery,
) -> Result<BookTicketContext> {
    let fare_per_seat = match (&query.route_no, &query.from, &query.to) {
        (Some(route_no), Some(from), Some(to)) => {
            match quote_journey(state, route_no, from, to, 1).await {
                Ok(quote) => Some(format_paise(quote.per_seat_paise)),
                Err(AppError::Database { message, source }) => {
                    return Err(AppError::Database { message, source });
                }
                Err(_) => None,
            }
        }
        _ => None,
    };

    Ok(BookTicketContext {
        route_no: query.route_no.clone(),
        from_stop: query.from.clone(),
        to_stop: query.to.clone(),
        base_fare: format_paise(state.fares.base_fare_paise()),
        fare_per_seat,
        currency: state.fares.currency().to_string(),
        razorpay_key_id: state.config.payment.public_key_id().to_string(),
    })
}

/// Prices the journey, opens a gateway order and records it as pending
pub async fn create_order(
    req: &HttpRequest,
    state: &AppState,
    principal: &Principal,
    request: &CreateOrderRequest,
) -> Result<CreateOrderResponse> {
    state.limiter.check_request(req, "payment")?;

    let seats = state.fares.check_seats(request.seats)?;
    let route = state.db.require_route(request.route_no.trim()).await?;
    let stops = state.db.route_stops(route.id).await?;
    let quote = state.fares.quote(&stops, &request.from, &request.to, seats)?;

    if let Some(schedule_id) = request.schedule_id {
        let schedule = state
            .db
            .find_schedule(schedule_id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule", schedule_id))?;
        if schedule.route_id != route.id {
            return Err(AppError::validation(
                "schedule_id",
                format!("schedule does not run route {}", route.route_no),
            ));
        }
        if schedule.available_seats < seats {
            return Err(AppError::Conflict(format!(
                "Only {} seats left on this departure",
                schedule.available_seats
            )));
        }
    }

    let receipt = format!("receipt_{}", Uuid::new_v4().simple());
    let gateway_order = state
        .payments
        .create_order(&OrderRequest {
            amount: quote.total_paise,
            currency: state.fares.currency().to_string(),
            receipt: receipt.clone(),
            payment_capture: 1,
        })
        .await
        .inspect_err(|_| state.metrics.record_payment_order("failed"))?;

    state
        .db
        .create_payment_order(&PaymentOrder {
            order_id: gateway_order.id.clone(),
            user_id: Some(principal.user_id),
            route_no: route.route_no.clone(),
            source: quote.from.clone(),
            destination: quote.to.clone(),
            seats,
            schedule_id: request.schedule_id,
            amount_paise: quote.total_paise,
            currency: gateway_order.currency.clone(),
            receipt: receipt.clone(),
            status: PaymentOrderStatus::Created,
            payment_id: None,
            booking_id: None,
            created_at: Utc::now(),
        })
        .await?;

    state.metrics.record_payment_order("created");
    info!(
        order_id = %gateway_order.id,
        user_id = principal.user_id,
        route_no = %route.route_no,
        amount_paise = quote.total_paise,
        "Payment order created"
    );

    Ok(CreateOrderResponse {
        id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        receipt: gateway_order.receipt.unwrap_or(receipt),
        status: gateway_order.status,
        key_id: state.config.payment.public_key_id().to_string(),
    })
}

/// Verifies the checkout signature and turns the paid order into a booking.
/// Replays of a settled order return the original booking.
pub async fn confirm_payment(
    req: &HttpRequest,
    state: &AppState,
    principal: &Principal,
    payment: &PaymentSuccessRequest,
) -> Result<PaymentSuccessResponse> {
    state.limiter.check_request(req, "payment")?;

    let order = state
        .db
        .find_payment_order(&payment.order_id)
        .await?
        .filter(|order| order.user_id == Some(principal.user_id))
        .ok_or_else(|| AppError::not_found("Payment order", &payment.order_id))?;

    if !state
        .payments
        .verify_checkout(&order.order_id, &payment.payment_id, &payment.signature)
    {
        state.metrics.record_payment_order("rejected");
        AuditEvent::from_request(req, AuditEventType::PaymentRejected, AuditOutcome::Failure)
            .with_user_id(Some(principal.username.clone()))
            .with_details(format!("order {}", order.order_id))
            .log();
        return Err(AppError::validation(
            "signature",
            "payment signature verification failed",
        ));
    }

    let settled = state
        .db
        .settle_payment_order(&order.order_id, &payment.payment_id, Utc::now())
        .await?;

    if settled.newly_created {
        state.metrics.record_payment_order("paid");
        state.metrics.record_booking("online");
        AuditEvent::from_request(req, AuditEventType::PaymentVerified, AuditOutcome::Success)
            .with_user_id(Some(principal.username.clone()))
            .with_booking(settled.booking.id)
            .log();
    } else {
        warn!(order_id = %order.order_id, "Payment confirmation replayed");
    }

    Ok(PaymentSuccessResponse {
        message: "Booking confirmed".to_string(),
        booking_id: settled.booking.id,
        redirect_url: format!("/booking-confirmation/{}/", settled.booking.id),
    })
}

/// Booking with its signed QR payload, created on first access
pub async fn ticket_view(state: &AppState, booking: Booking) -> Result<BookingView> {
    let mut booking = booking;
    if booking.qr_payload.is_none() {
        let payload = state.tickets.issue(booking.id)?;
        booking.qr_payload = Some(state.db.ensure_qr_payload(booking.id, &payload).await?);
    }
    Ok(BookingView::from(&booking))
}

/// A passenger sees only their own bookings; administrators see all
pub async fn booking_confirmation(
    state: &AppState,
    principal: &Principal,
    booking_id: i64,
) -> Result<BookingView> {
    let booking = state
        .db
        .find_booking(booking_id)
        .await?
        .filter(|b| principal.role == Role::Admin || b.user_id == Some(principal.user_id))
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    ticket_view(state, booking).await
}

pub async fn my_bookings(state: &AppState, principal: &Principal) -> Result<Vec<BookingView>> {
    let bookings = state.db.bookings_for_user(principal.user_id, None).await?;
    Ok(bookings.iter().map(BookingView::from).collect())
}

pub async fn recent_bookings(state: &AppState, principal: &Principal) -> Result<Vec<RecentBooking>> {
    let bookings = state
        .db
        .bookings_for_user(principal.user_id, Some(RECENT_BOOKINGS))
        .await?;
    Ok(bookings
        .into_iter()
        .map(|b| RecentBooking {
            route_no: b.route_no,
            from_stop: b.source,
            to_stop: b.destination,
        })
        .collect())
}

/// Every booking, newest first, for administrators
pub async fn list_bookings(state: &AppState, page: Option<i64>) -> Result<BookingPage> {
    let (page, offset) = reports::page_offset(page)?;
    let (bookings, total) = state.db.list_bookings(REPORTS_PER_PAGE, offset).await?;
    Ok(BookingPage {
        items: bookings.iter().map(BookingView::from).collect(),
        page,
        per_page: REPORTS_PER_PAGE,
        total,
    })
}

/// On-board cash sale. The cash handed over defaults to the exact fare and
/// may not be less than it.
pub async fn manual_booking(
    req: &HttpRequest,
    state: &AppState,
    principal: &Principal,
    conductor_id: i64,
    request: &ManualBookingRequest,
) -> Result<ManualBookingResponse> {
    let seats = state.fares.check_seats(request.seats)?;
    let quote = quote_journey(
        state,
        &request.route_no,
        &request.from_stop,
        &request.to_stop,
        seats,
    )
    .await?;

    let cash_paise = match request.cash_received {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            return Err(AppError::validation("cash_received", "must be a positive amount"));
        }
        Some(amount) => paise_from_amount(amount),
        None => quote.total_paise,
    };
    if cash_paise < quote.total_paise {
        return Err(AppError::validation(
            "cash_received",
            format!("fare is {}", format_paise(quote.total_paise)),
        ));
    }

    let booking = state
        .db
        .create_cash_booking(
            &NewBooking {
                user_id: None,
                route_no: request.route_no.trim().to_string(),
                source: quote.from.clone(),
                destination: quote.to.clone(),
                schedule_id: None,
                seats,
                fare_paise: quote.total_paise,
                channel: BookingChannel::Conductor,
            },
            conductor_id,
            cash_paise,
            Utc::now(),
        )
        .await?;

    state.metrics.record_booking("conductor");
    AuditEvent::from_request(req, AuditEventType::ManualBooking, AuditOutcome::Success)
        .with_user_id(Some(principal.username.clone()))
        .with_booking(booking.id)
        .log();

    let change_due = cash_paise - booking.fare_paise;
    Ok(ManualBookingResponse {
        booking: ticket_view(state, booking).await?,
        cash_received: format_paise(cash_paise),
        change_due: format_paise(change_due),
    })
}

/// Receipt for a ticket sold on board
pub async fn ticket_success(state: &AppState, booking_id: i64) -> Result<BookingView> {
    let booking = state
        .db
        .find_booking(booking_id)
        .await?
        .filter(|b| b.channel == BookingChannel::Conductor)
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    ticket_view(state, booking).await
}
