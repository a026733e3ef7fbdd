//! Rate limiting configuration.

use super::env_or;

/// Fixed-window limits applied per client IP to login, payment and
/// ticket-verification endpoints
#[derive(Clone)]
pub struct RateLimitConfig {
    pub requests_per_window: usize,
    pub window_seconds: u64,
    /// Failed logins from one IP before it is flagged as suspicious
    pub max_login_failures: usize,
    pub login_failure_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 100,
            window_seconds: 60,
            max_login_failures: 5,
            login_failure_window_seconds: 300,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            requests_per_window: env_or("RATE_LIMIT_RPM", defaults.requests_per_window),
            window_seconds: env_or("RATE_LIMIT_PERIOD", defaults.window_seconds),
            max_login_failures: env_or("AUTH_MAX_FAILURES", defaults.max_login_failures),
            login_failure_window_seconds: env_or(
                "AUTH_FAILURE_WINDOW",
                defaults.login_failure_window_seconds,
            ),
        }
    }
}
