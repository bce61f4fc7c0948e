//! PostgreSQL connection pool.
//!
//! The pool is the only shared mutable resource of the ledger. It bounds the
//! number of open connections and evicts idle and long-lived ones.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Pool sizing and eviction policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    /// How long a caller waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(60 * 60),
            idle_timeout: Duration::from_secs(30 * 60),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl PoolSettings {
    pub fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .max_lifetime(self.max_lifetime)
            .idle_timeout(self.idle_timeout)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Create a PostgreSQL connection pool and check that the database answers.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let pool = settings
        .options()
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    ping(&pool).await?;
    info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "database connected"
    );
    Ok(pool)
}

/// Round-trip a trivial query.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Failed to ping database")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, 25);
        assert_eq!(settings.min_connections, 5);
        assert_eq!(settings.max_lifetime, Duration::from_secs(3600));
        assert_eq!(settings.idle_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn test_options_clamp_min_to_max() {
        let settings = PoolSettings {
            max_connections: 2,
            min_connections: 10,
            ..PoolSettings::default()
        };
        let options = settings.options();
        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(1800)));
    }

    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_connect_and_ping() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect(&url, &PoolSettings::default())
            .await
            .expect("pool creation failed");
        ping(&pool).await.expect("ping failed");
    }
}
