//! Security headers configuration.

use super::{env_flag, env_or, env_string};

const DEFAULT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Response headers added to every API response
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: DEFAULT_CSP.to_string(),
            hsts_enabled: true,
            hsts_max_age: 31_536_000,
            frame_options: "DENY".to_string(),
            content_type_options: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    pub fn from_env() -> Self {
        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", true),
            csp_directives: env_string("CSP_DIRECTIVES", DEFAULT_CSP),
            hsts_enabled: env_flag("HSTS_ENABLED", true),
            hsts_max_age: env_or("HSTS_MAX_AGE", 31_536_000),
            frame_options: env_string("X_FRAME_OPTIONS", "DENY"),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", true),
            referrer_policy: env_string("REFERRER_POLICY", "no-referrer"),
        }
    }
}
