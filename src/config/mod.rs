//! Configuration module for the probe and SLA daemons.
//!
//! Both daemons read an immutable snapshot from environment variables once at
//! startup. Parsing goes through a lookup function so the same code serves the
//! process environment and in-memory maps in tests.

mod prober_config;
mod sla_config;

pub use prober_config::ProberConfig;
pub use sla_config::{SinkConfig, SlaConfig};

use crate::domain::errors::ConfigError;
use anyhow::Context;
use std::env;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Source of configuration values, keyed by variable name
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Loads a dotenv file into the process environment. Without an explicit
/// path a missing `./.env` is not an error.
pub fn load_dotenv(path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

/// Reads from the process environment.
pub fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Blank values count as unset.
fn read(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(lookup: Lookup<'_>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match read(lookup, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_interval(
    lookup: Lookup<'_>,
    key: &'static str,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let secs = parse_or::<u64>(lookup, key, default_secs)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_url(key: &'static str, raw: String) -> Result<Url, ConfigError> {
    let url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_log_level(lookup: Lookup<'_>) -> Result<Level, ConfigError> {
    const KEY: &str = "LOG_LEVEL";
    let Some(raw) = read(lookup, KEY) else {
        return Ok(Level::INFO);
    };

    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "critical" | "fatal" => Ok(Level::ERROR),
        _ => Err(ConfigError::Invalid {
            key: KEY,
            value: raw,
            reason: "expected one of trace, debug, info, warn, error".to_string(),
        }),
    }
}
