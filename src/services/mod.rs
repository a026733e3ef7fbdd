//! Business logic and service layer modules.
//!
//! Request-facing operations live in one module per concern and take the
//! shared [`AppState`](crate::state::AppState). The stateful building blocks
//! (fare calculator, ticket signer, payment gateway, limiter, activity
//! tracker, metrics) are re-exported here.

pub mod accounts;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod fare;
pub mod fleet;
pub mod metrics;
pub mod passwords;
pub mod payment;
pub mod rate_limit;
pub mod reporting;
pub mod reports;
pub mod suspicious_activity;
pub mod tickets;
pub mod tracking;
pub mod validation;

pub use fare::{FareCalculator, FareQuote};
pub use metrics::AppMetrics;
pub use payment::PaymentGateway;
pub use rate_limit::SimpleRateLimiter;
pub use suspicious_activity::SuspiciousActivityTracker;
pub use tickets::TicketSigner;
