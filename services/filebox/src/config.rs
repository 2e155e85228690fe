//! HTTP listener and upload directory configuration

use anyhow::Result;
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Listener port
    pub port: u16,
    /// Root directory for uploaded files
    pub upload_dir: PathBuf,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: 0.0.0.0)
    /// - `PORT`: Listener port (default: 8080)
    /// - `UPLOAD_DIR`: Root directory for uploads (default: uploads)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", value, e))?,
            Err(_) => 8080,
        };

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        Ok(AppConfig {
            host,
            port,
            upload_dir: PathBuf::from(upload_dir),
        })
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        unsafe {
            std::env::remove_var("HOST");
            std::env::remove_var("PORT");
            std::env::remove_var("UPLOAD_DIR");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("PORT", "9090");
            std::env::set_var("UPLOAD_DIR", "/var/lib/filebox");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.upload_dir, PathBuf::from("/var/lib/filebox"));

        unsafe {
            std::env::set_var("PORT", "not-a-port");
        }
        assert!(AppConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("UPLOAD_DIR");
        }
    }
}
