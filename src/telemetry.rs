//! Tracing setup.
//!
//! `RUST_LOG` takes precedence over the configured level. An unparsable
//! level falls back to `info`. Output goes to stderr.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Parse a level name such as `debug` or `WARN`.
pub fn parse_level(log_level: &str) -> LevelFilter {
    // `LevelFilter` parses "" as ERROR
    match log_level.trim() {
        "" => LevelFilter::INFO,
        level => level.parse().unwrap_or(LevelFilter::INFO),
    }
}

/// Build the filter from `RUST_LOG`, defaulting to `log_level`.
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(parse_level(log_level).into())
        .from_env_lossy()
}

/// Install the global subscriber.
pub fn init_tracing(log_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
