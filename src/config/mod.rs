//! Configuration structures and loading utilities.
//!
//! Each concern owns a small struct with sensible defaults and a `from_env`
//! constructor. [`AppConfig`] bundles them for the app factory.

pub mod accounts;
pub mod database;
pub mod fare;
pub mod hmac;
pub mod metrics;
pub mod payment;
pub mod rate_limit;
pub mod security;
pub mod server;
pub mod ticket;

pub use accounts::*;
pub use database::*;
pub use fare::*;
pub use hmac::*;
pub use metrics::*;
pub use payment::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;
pub use ticket::*;

use std::{env, str::FromStr};

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag; only the literal `true` (any case) enables it.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Complete service configuration.
#[derive(Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub fare: FareConfig,
    pub ticket: TicketConfig,
    pub payment: PaymentConfig,
    pub admin: AdminConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityHeadersConfig,
    pub hmac: HmacConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            fare: FareConfig::from_env(),
            ticket: TicketConfig::from_env(),
            payment: PaymentConfig::from_env(),
            admin: AdminConfig::from_env(),
            session: SessionConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            security: SecurityHeadersConfig::from_env(),
            hmac: HmacConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}
