//! Route pattern extraction for metric labels.

use actix_web::HttpRequest;

/// Matched resource pattern (e.g. `/booking-confirmation/{booking_id}/`) so
/// that ids do not explode label cardinality. Unmatched paths collapse to
/// `/unknown`.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
