//! Device request signing configuration.

use super::{env_flag, env_or, env_string};

/// HMAC signature validation for requests sent by on-board devices
/// (location pings). Disabled unless `HMAC_REQUIRE_SIGNATURE=true`.
#[derive(Clone)]
pub struct HmacConfig {
    pub secret: String,
    pub timestamp_tolerance_seconds: u64,
    pub require_signature: bool,
}

impl Default for HmacConfig {
    fn default() -> Self {
        Self {
            secret: "default-device-secret".to_string(),
            timestamp_tolerance_seconds: 300,
            require_signature: false,
        }
    }
}

impl HmacConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env_string("HMAC_SECRET", "default-device-secret"),
            timestamp_tolerance_seconds: env_or("HMAC_TIMESTAMP_TOLERANCE", 300),
            require_signature: env_flag("HMAC_REQUIRE_SIGNATURE", false),
        }
    }
}
