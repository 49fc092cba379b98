//! Server configuration

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: 0.0.0.0)
    pub host: String,
    /// Port to listen on (default: 3001)
    pub port: u16,
}

impl ServerConfig {
    /// Load the server configuration from environment variables
    ///
    /// # Environment Variables
    /// - `API_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `API_PORT`: Port to listen on (default: 3001)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .add_source(Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Socket address string for the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe {
            std::env::remove_var("API_HOST");
            std::env::remove_var("API_PORT");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        unsafe {
            std::env::set_var("API_HOST", "127.0.0.1");
            std::env::set_var("API_PORT", "8888");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.address(), "127.0.0.1:8888");

        unsafe {
            std::env::remove_var("API_HOST");
            std::env::remove_var("API_PORT");
        }
    }
}
