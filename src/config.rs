//! Runtime configuration, read from flags or the environment.
//!
//! Environment variables can also come from a `config.env` file in the
//! working directory, loaded before argument parsing.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::storage::PoolSettings;

/// Name of the optional env file read at startup.
pub const ENV_FILE: &str = "config.env";

/// Load `config.env` if present. A missing file is fine, an unreadable one is not.
pub fn load_env_file() -> Result<()> {
    load_env_file_from(Path::new(ENV_FILE))
}

pub fn load_env_file_from(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load env file {}", path.display()))
        }
    }
}

/// Database connection and pool options.
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 25)]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, env = "DB_MIN_CONNECTIONS", default_value_t = 5)]
    pub min_connections: u32,

    /// Close connections older than this many seconds
    #[arg(long, env = "DB_MAX_LIFETIME_SECS", default_value_t = 3600)]
    pub max_lifetime_secs: u64,

    /// Close connections idle for this many seconds
    #[arg(long, env = "DB_IDLE_TIMEOUT_SECS", default_value_t = 1800)]
    pub idle_timeout_secs: u64,

    /// Give up waiting for a free connection after this many seconds
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseArgs {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            max_lifetime: Duration::from_secs(self.max_lifetime_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

/// HTTP listener options.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        db: DatabaseArgs,
        #[command(flatten)]
        server: ServerArgs,
    }

    #[test]
    fn test_defaults_match_pool_settings() {
        let cli = TestCli::try_parse_from(["walletd", "--database-url", "postgres://localhost/wallet"])
            .unwrap();

        assert_eq!(cli.db.database_url, "postgres://localhost/wallet");
        assert_eq!(cli.db.pool_settings(), PoolSettings::default());
        assert_eq!(cli.server.bind_addr.port(), 8080);
    }

    #[test]
    fn test_pool_overrides() {
        let cli = TestCli::try_parse_from([
            "walletd",
            "--database-url",
            "postgres://localhost/wallet",
            "--max-connections",
            "50",
            "--idle-timeout-secs",
            "60",
            "--bind-addr",
            "127.0.0.1:9000",
        ])
        .unwrap();

        let settings = cli.db.pool_settings();
        assert_eq!(settings.max_connections, 50);
        assert_eq!(settings.idle_timeout, Duration::from_secs(60));
        assert_eq!(cli.server.bind_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let path = std::env::temp_dir().join(format!("walletd-missing-{}.env", uuid::Uuid::new_v4()));
        assert!(load_env_file_from(&path).is_ok());
    }
}
