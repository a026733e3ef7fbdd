//! Metrics endpoint handler.

use crate::state::AppState;
use actix_web::{Error, HttpResponse, Result};
use paperclip::actix::{api_v2_operation, web};

/// Prometheus metrics endpoint
///
/// Returns Prometheus-formatted metrics, including the booking, ticket and
/// payment counters. Typically scraped by monitoring systems.
#[api_v2_operation(
    summary = "Prometheus Metrics Endpoint",
    description = "Returns Prometheus-formatted metrics for monitoring API performance and usage patterns.",
    tags("Metrics"),
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 503, description = "Metrics collection disabled")
    )
)]
pub async fn get_metrics(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    if !state.config.metrics.enabled {
        return Ok(HttpResponse::ServiceUnavailable()
            .content_type("text/plain")
            .body("Metrics collection is disabled"));
    }

    state.metrics.update_uptime();
    match state.metrics.render() {
        Ok(output) => Ok(HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(output)),
        Err(e) => Err(actix_web::error::ErrorInternalServerError(format!(
            "Failed to render metrics: {e}"
        ))),
    }
}
