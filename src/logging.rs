// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level precedence: `--log-level`, then `AZKABAN_JOBS_LOG`, then `info`.
//! Logs go to STDERR so `graph` and `build --dry-run` output can be piped.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "AZKABAN_JOBS_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Pick the effective level. An unparseable environment value is ignored.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(parse_level_str))
        .unwrap_or(Level::INFO)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
