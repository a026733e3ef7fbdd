//! Middleware for security headers, request ids and request metrics.

pub mod metrics;
pub mod request_id;
pub mod security;

pub use metrics::*;
pub use request_id::*;
pub use security::*;
