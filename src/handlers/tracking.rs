//! Live bus tracking handlers.

use crate::{
    models::{BusPosition, Coordinates, MessageResponse, TrackBusResponse},
    services::{auth, tracking},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result};
use paperclip::actix::{api_v2_operation, web};

/// Report a bus position
///
/// Sent by the conductor's device as a JSON body `{"bus_id", "lat", "lng"}`.
/// When `HMAC_REQUIRE_SIGNATURE` is set the request must carry `X-Signature`
/// and `X-Timestamp` computed over the body bytes as sent.
#[api_v2_operation(
    summary = "Update Location",
    description = "Record the current position of a bus",
    tags("Tracking"),
    responses(
        (status = 200, description = "Position recorded", body = MessageResponse),
        (status = 400, description = "Coordinates out of range"),
        (status = 401, description = "Missing or invalid device signature"),
        (status = 404, description = "Unknown bus")
    )
)]
pub async fn update_location(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<web::Json<MessageResponse>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    tracking::update_location(&req, &state, &body).await?;
    Ok(web::Json(MessageResponse::new("Location updated")))
}

#[api_v2_operation(
    summary = "Bus Locations",
    description = "Latest position of every bus that has reported one",
    tags("Tracking"),
    responses((status = 200, description = "Positions"))
)]
pub async fn bus_locations(
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<BusPosition>>, Error> {
    Ok(web::Json(tracking::positions(&state).await?))
}

#[api_v2_operation(
    summary = "Bus Location",
    description = "Latest position of one bus; empty until the bus reports",
    tags("Tracking"),
    responses(
        (status = 200, description = "Latest fix"),
        (status = 404, description = "Unknown bus")
    )
)]
pub async fn bus_location(
    state: web::Data<AppState>,
    bus_id: web::Path<String>,
) -> Result<web::Json<Vec<Coordinates>>, Error> {
    let latest = tracking::bus_position(&state, &bus_id).await?;
    Ok(web::Json(latest.into_iter().collect()))
}

#[api_v2_operation(
    summary = "Track Bus",
    tags("Tracking"),
    responses(
        (status = 200, description = "Bus exists", body = TrackBusResponse),
        (status = 404, description = "Unknown bus")
    )
)]
pub async fn track_bus(
    state: web::Data<AppState>,
    bus_id: web::Path<String>,
) -> Result<web::Json<TrackBusResponse>, Error> {
    let bus = state.db.require_bus(bus_id.trim()).await?;
    Ok(web::Json(TrackBusResponse { bus_id: bus.bus_id }))
}
