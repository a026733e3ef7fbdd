//! HTTP server binding configuration.

use std::env;

const LOCAL_BIND: &str = "127.0.0.1:8080";
const CONTAINER_BIND: &str = "0.0.0.0:8080";

/// Where the HTTP server listens
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: LOCAL_BIND.to_string(),
            workers: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_address = env::var("BIND_ADDRESS").ok().unwrap_or_else(|| {
            detect_bind_address(
                env::var("KUBERNETES_SERVICE_HOST").is_ok(),
                env::var("DOCKER_CONTAINER").is_ok(),
            )
        });

        let workers = env::var("HTTP_WORKERS").ok().and_then(|v| v.parse().ok());

        Self {
            bind_address,
            workers,
        }
    }

    /// Log-friendly public URL
    pub fn display_url(&self) -> String {
        format!("http://{}", self.bind_address)
    }
}

/// Containers must listen on every interface to be reachable; local
/// development stays on loopback.
pub fn detect_bind_address(in_kubernetes: bool, in_docker: bool) -> String {
    if in_kubernetes || in_docker {
        CONTAINER_BIND.to_string()
    } else {
        LOCAL_BIND.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_development_binds_loopback() {
        assert_eq!(detect_bind_address(false, false), "127.0.0.1:8080");
    }

    #[test]
    fn test_container_detection() {
        assert_eq!(detect_bind_address(true, false), "0.0.0.0:8080");
        assert_eq!(detect_bind_address(false, true), "0.0.0.0:8080");
    }

    #[test]
    fn test_display_url() {
        let config = ServerConfig {
            bind_address: "127.0.0.1:9000".into(),
            workers: None,
        };
        assert_eq!(config.display_url(), "http://127.0.0.1:9000");
    }
}
