//! PostgreSQL configuration

use std::time::Duration;

use rsac_core::error::{ReportError, Result};

/// PostgreSQL connection configuration.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Connection pool configuration
    pub pool: PoolConfig,
}

impl PostgresConfig {
    /// Create a new configuration with the given database URL.
    pub fn new(database_url: impl Into<String>) -> Result<Self> {
        let database_url = database_url.into();
        if database_url.trim().is_empty() {
            return Err(ReportError::ConfigInvalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(Self {
            database_url,
            pool: PoolConfig::default(),
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(ReportError::ConfigInvalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        self.pool.validate()
    }
}

/// Connection pool configuration. The pool's concurrency limit is what bounds
/// simultaneous report requests; excess requests queue at the pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(ReportError::ConfigInvalid {
                key: "pool.max_connections".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ReportError::ConfigInvalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_valid() {
        assert!(PostgresConfig::new("postgresql://localhost/rsac").is_ok());
    }

    #[test]
    fn test_config_new_empty_url() {
        assert!(PostgresConfig::new("").is_err());
        assert!(PostgresConfig::new("   ").is_err());
    }

    #[test]
    fn test_pool_config_default_is_valid() {
        let pool = PoolConfig::default();
        assert_eq!(pool.min_connections, 2);
        assert_eq!(pool.max_connections, 10);
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_pool_config_invalid_min_max() {
        let mut pool = PoolConfig::default();
        pool.min_connections = 20;
        assert!(pool.validate().is_err());
    }

    #[test]
    fn test_pool_config_zero_max() {
        let mut pool = PoolConfig::default();
        pool.max_connections = 0;
        assert!(pool.validate().is_err());
    }
}
