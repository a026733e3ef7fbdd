//! HTTP utility functions for extracting request information.

use actix_web::{HttpMessage, HttpRequest};

/// Extract client IP address from request headers
///
/// Prefers proxy headers and falls back to the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let ip_headers = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

    for header_name in &ip_headers {
        if let Some(header_str) = req.headers().get(*header_name).and_then(|h| h.to_str().ok()) {
            // X-Forwarded-For can contain multiple IPs, take the first one
            let ip = header_str.split(',').next().unwrap_or(header_str).trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme
                .eq_ignore_ascii_case("bearer")
                .then(|| token.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// Request attributes attached to log lines and audit events
pub struct RequestFields {
    pub request_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: String,
    pub method: String,
    pub path: String,
}

impl RequestFields {
    pub fn from_request(req: &HttpRequest) -> Self {
        // The extensions borrow must end before connection_info() borrows them mutably
        let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
        Self {
            request_id,
            user_agent: extract_user_agent(req),
            ip_address: extract_client_ip(req),
            method: req.method().to_string(),
            path: req.path().to_string(),
        }
    }
}

/// Request id stored in request extensions by the request-id middleware
#[derive(Clone, Debug)]
pub struct RequestId(pub String);
