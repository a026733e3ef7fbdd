//! Fixed-window request limiter keyed by client IP.

use crate::{config::RateLimitConfig, error::AppError, utils::extract_client_ip};
use actix_web::HttpRequest;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// In-memory limiter shared by every worker through `web::Data`
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts a request for `key`; `false` once the window's budget is spent
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let window = Duration::from_secs(self.config.window_seconds);
        let now = Instant::now();
        // The map holds plain counters, so a poisoned lock is still usable
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);

        storage.retain(|_, (_, started)| now.duration_since(*started) < window);

        let (count, _) = storage.entry(key.to_string()).or_insert((0, now));
        if *count >= self.config.requests_per_window {
            return false;
        }
        *count += 1;
        true
    }

    /// Limits by `<scope>:<client ip>` so each protected endpoint family has
    /// its own budget
    pub fn check_request(&self, req: &HttpRequest, scope: &str) -> Result<(), AppError> {
        let key = format!("{scope}:{}", extract_client_ip(req));
        if self.check_rate_limit(&key) {
            Ok(())
        } else {
            tracing::warn!(scope, key = %key, "Rate limit exceeded");
            Err(AppError::RateLimited)
        }
    }
}
