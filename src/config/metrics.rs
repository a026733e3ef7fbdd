//! Metrics configuration.

use super::env_or;

#[derive(Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_or("METRICS_ENABLED", true),
        }
    }
}
