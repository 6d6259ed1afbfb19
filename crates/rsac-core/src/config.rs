//! Environment-driven server configuration.

use crate::error::{ReportError, Result};

/// Default listen port, kept in line with the legacy deployment.
pub const DEFAULT_PORT: u16 = 5000;

/// Top-level application configuration.
///
/// `database_url` is optional: when absent the server falls back to the
/// in-memory store, which is only useful for development and tests.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to (`RSAC_PORT`)
    pub port: u16,
    /// PostgreSQL connection URL (`DATABASE_URL`)
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("RSAC_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ReportError::ConfigInvalid {
                key: "RSAC_PORT".to_string(),
                reason: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) if url.trim().is_empty() => {
                return Err(ReportError::ConfigInvalid {
                    key: "DATABASE_URL".to_string(),
                    reason: "cannot be empty".to_string(),
                })
            }
            Ok(url) => Some(url),
            Err(_) => None,
        };

        Ok(Self { port, database_url })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5000);
        assert!(config.database_url.is_none());
    }
}
