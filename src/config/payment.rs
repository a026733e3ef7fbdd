//! Payment gateway configuration.

use super::{env_or, env_string};
use std::env;

/// Razorpay credentials and client behaviour.
///
/// When `key_id` is absent the service falls back to an offline gateway that
/// mints order identifiers locally and verifies callbacks with `key_secret`.
#[derive(Clone)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: String,
    pub api_base: String,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: "offline-payment-secret".to_string(),
            api_base: "https://api.razorpay.com/v1".to_string(),
            max_retries: 3,
            initial_backoff_ms: 100,
            timeout_seconds: 10,
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            key_id: env::var("RAZORPAY_KEY_ID").ok().filter(|k| !k.is_empty()),
            key_secret: env_string("RAZORPAY_KEY_SECRET", &defaults.key_secret),
            api_base: env_string("RAZORPAY_API_BASE", &defaults.api_base),
            max_retries: env_or("PAYMENT_MAX_RETRIES", defaults.max_retries),
            initial_backoff_ms: env_or("PAYMENT_INITIAL_BACKOFF_MS", defaults.initial_backoff_ms),
            timeout_seconds: env_or("PAYMENT_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }

    /// Key id handed to clients for checkout
    pub fn public_key_id(&self) -> &str {
        self.key_id.as_deref().unwrap_or("offline")
    }
}
