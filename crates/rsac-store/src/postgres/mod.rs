//! PostgreSQL storage adapter

pub mod config;
mod dashboard;
mod report;

pub use config::{PoolConfig, PostgresConfig};

use rsac_core::error::{ReportError, Result};
use rsac_core::query::{SqlParam, SqlQuery};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

/// PostgreSQL-backed store. Cloneable handle over one shared connection pool
/// whose lifetime is tied to process startup/shutdown.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store with the given configuration and verify the
    /// connection with a probe query.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| ReportError::Database(format!("Failed to connect to database: {e}")))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| ReportError::Database(format!("Connection test failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Attach a [`SqlQuery`]'s bound parameters to a sqlx query in `$n` order.
pub(crate) fn bind_params<'q>(query: &'q SqlQuery) -> Query<'q, Postgres, PgArguments> {
    let mut q = sqlx::query(&query.sql);
    for param in &query.params {
        q = match param {
            SqlParam::Text(s) => q.bind(s.as_str()),
            SqlParam::Int(i) => q.bind(*i),
        };
    }
    q
}

pub(crate) fn db_err(e: sqlx::Error) -> ReportError {
    ReportError::Database(e.to_string())
}
