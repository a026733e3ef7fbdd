//! Failed-login tracking per client IP.

use crate::config::RateLimitConfig;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Flags an IP once it reaches `max_login_failures` failed logins within the
/// failure window
#[derive(Clone)]
pub struct SuspiciousActivityTracker {
    failed_attempts: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
    max_failures: usize,
    window: Duration,
}

impl SuspiciousActivityTracker {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            failed_attempts: Arc::new(Mutex::new(HashMap::new())),
            max_failures: config.max_login_failures.max(1),
            window: Duration::from_secs(config.login_failure_window_seconds),
        }
    }

    /// Records a failure; returns `true` when the IP has reached the threshold
    pub fn record_failure(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self
            .failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        attempts.retain(|_, (_, first)| now.duration_since(*first) < self.window);

        let (count, _) = attempts.entry(ip.to_string()).or_insert((0, now));
        *count += 1;
        *count >= self.max_failures
    }

    pub fn is_suspicious(&self, ip: &str) -> bool {
        let attempts = self
            .failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        attempts.get(ip).is_some_and(|(count, first)| {
            first.elapsed() < self.window && *count >= self.max_failures
        })
    }

    /// Forget failures after a successful login
    pub fn clear(&self, ip: &str) {
        self.failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let tracker = SuspiciousActivityTracker::new(&RateLimitConfig {
            max_login_failures: 3,
            ..RateLimitConfig::default()
        });
        assert!(!tracker.record_failure("1.2.3.4"));
        assert!(!tracker.record_failure("1.2.3.4"));
        assert!(!tracker.is_suspicious("1.2.3.4"));
        assert!(tracker.record_failure("1.2.3.4"));
        assert!(tracker.is_suspicious("1.2.3.4"));
        assert!(!tracker.is_suspicious("5.6.7.8"));

        tracker.clear("1.2.3.4");
        assert!(!tracker.is_suspicious("1.2.3.4"));
    }
}
