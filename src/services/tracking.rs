//! Live bus positions reported by conductor devices.

use crate::{
    error::{AppError, Result},
    models::{BusPosition, Coordinates, LocationUpdate},
    services::auth::verify_device_signature,
    state::AppState,
    utils::validate::{is_valid_latitude, is_valid_longitude},
};
use actix_web::HttpRequest;
use chrono::Utc;
use tracing::debug;

/// Records a position fix from the raw request body. When device signing is
/// enforced the signature covers the body bytes exactly as received.
pub async fn update_location(req: &HttpRequest, state: &AppState, body: &[u8]) -> Result<()> {
    let text = std::str::from_utf8(body)
        .map_err(|_| AppError::validation("body", "must be UTF-8 JSON"))?;
    verify_device_signature(req, text, &state.config.hmac)?;
    let update: LocationUpdate = serde_json::from_str(text)
        .map_err(|e| AppError::validation("body", e.to_string()))?;

    if !is_valid_latitude(update.lat) {
        return Err(AppError::validation("lat", "must be within -90..=90"));
    }
    if !is_valid_longitude(update.lng) {
        return Err(AppError::validation("lng", "must be within -180..=180"));
    }

    let bus = state.db.require_bus(update.bus_id.trim()).await?;
    state
        .db
        .record_location(bus.id, update.lat, update.lng, Utc::now())
        .await?;

    debug!(bus_id = %bus.bus_id, lat = update.lat, lng = update.lng, "Location recorded");
    Ok(())
}

pub async fn positions(state: &AppState) -> Result<Vec<BusPosition>> {
    state.db.latest_positions().await
}

/// Latest fix of one bus; `None` until the bus has reported
pub async fn bus_position(state: &AppState, bus_code: &str) -> Result<Option<Coordinates>> {
    let bus = state.db.require_bus(bus_code.trim()).await?;
    state.db.latest_position(bus.id).await
}
