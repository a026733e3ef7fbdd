//! Ticket signing configuration.

use super::env_string;

/// Secret used to sign QR ticket payloads
#[derive(Clone)]
pub struct TicketConfig {
    pub signing_secret: String,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            signing_secret: "change-me-ticket-secret".to_string(),
        }
    }
}

impl TicketConfig {
    pub fn from_env() -> Self {
        Self {
            signing_secret: env_string("TICKET_SIGNING_SECRET", "change-me-ticket-secret"),
        }
    }
}
