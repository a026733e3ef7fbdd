//! HTTP request handlers for API endpoints.
//!
//! One module per concern. Handlers authenticate, call into
//! [`services`](crate::services) and wrap the result as JSON; errors surface
//! through [`AppError`](crate::error::AppError).

pub mod accounts;
pub mod booking;
pub mod conductor;
pub mod fleet;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod reports;
pub mod tracking;
pub mod version;

pub use openapi::{create_app, create_openapi_spec};
