//! Account bootstrap and session settings.

use super::{env_or, env_string};
use std::env;

/// Administrator created at start-up when missing
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self {
            username: env_string("ADMIN_USERNAME", "admin"),
            password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        }
    }
}

/// Bearer session lifetime
#[derive(Clone)]
pub struct SessionConfig {
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            ttl_hours: env_or("SESSION_TTL_HOURS", 24),
        }
    }
}
