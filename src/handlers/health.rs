//! Health check endpoint handler.

use crate::{models::HealthResponse, state::AppState};
use actix_web::{Error, HttpResponse, Result};
use paperclip::actix::{api_v2_operation, web};

/// Health check endpoint
///
/// Returns the health of the service and its database. Load balancers and
/// probes treat anything but 200 as unhealthy.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API and its database in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    if state.db.ping().await {
        Ok(HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            database: "ok".to_string(),
        }))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unhealthy".to_string(),
            database: "unreachable".to_string(),
        }))
    }
}
