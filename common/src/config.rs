//! Application configuration.
//!
//! Loads service configuration from environment variables with sensible
//! defaults for local development.

/// Runtime configuration for a service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the service (used in logs and response metadata).
    pub service_name: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl AppConfig {
    /// Loads configuration for the given service from the environment.
    ///
    /// Recognized variables: `SERVER_HOST`, `SERVER_PORT`. `default_port`
    /// applies when `SERVER_PORT` is unset or unparseable.
    pub fn load_with_service(service_name: &str, default_port: u16) -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_port);

        Self {
            service_name: service_name.to_string(),
            host,
            port,
        }
    }

    /// Returns the socket address string to bind to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_applies_when_env_unset() {
        std::env::remove_var("SERVER_PORT");
        let config = AppConfig::load_with_service("test-service", 8080);
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_name, "test-service");
    }
}

