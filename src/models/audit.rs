//! Audit logging data structures and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Security-relevant events worth an audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Signup,
    LoginSuccess,
    LoginFailure,
    Logout,
    SuspiciousActivity,
    RateLimitExceeded,
    PaymentVerified,
    PaymentRejected,
    ManualBooking,
    TicketValidated,
    TicketRejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// Structured audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_type: AuditEventType,
    pub outcome: AuditOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub user_id: Option<String>,
    pub method: String,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub booking_id: Option<i64>,
    pub details: Option<String>,
}

impl AuditEvent {
    pub fn new(
        event_type: AuditEventType,
        outcome: AuditOutcome,
        ip_address: String,
        method: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            user_agent: None,
            user_id: None,
            method,
            endpoint,
            request_id: None,
            booking_id: None,
            details: None,
        }
    }

    /// Start an event from the request that triggered it
    pub fn from_request(
        req: &actix_web::HttpRequest,
        event_type: AuditEventType,
        outcome: AuditOutcome,
    ) -> Self {
        let fields = crate::utils::http::RequestFields::from_request(req);
        Self::new(event_type, outcome, fields.ip_address, fields.method, fields.path)
            .with_user_agent(fields.user_agent)
            .with_request_id(fields.request_id)
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_booking(mut self, booking_id: i64) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Emit the event at target `audit`
    pub fn log(&self) {
        info!(
            target: "audit",
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            ip_address = %self.ip_address,
            user_agent = ?self.user_agent,
            user_id = ?self.user_id,
            method = %self.method,
            endpoint = %self.endpoint,
            request_id = ?self.request_id,
            booking_id = ?self.booking_id,
            details = ?self.details,
            "Audit event"
        );
    }
}
