//! Probe daemon configuration.

use super::{Lookup, env_lookup, parse_interval, parse_log_level, parse_or, parse_url, read};
use crate::domain::errors::ConfigError;
use crate::domain::probe::RecordLabels;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_PROBE_METRICS_PORT: u16 = 9100;

/// Probe daemon environment configuration
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// As configured; probed and recorded verbatim.
    pub target_url: String,
    pub scrape_interval: Duration,
    pub log_level: Level,
    pub metrics_port: u16,
    pub instance: String,
    pub system_tag: String,
    pub env_tag: String,
}

impl ProberConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let raw_target =
            read(lookup, "TARGET_URL").ok_or(ConfigError::Missing { key: "TARGET_URL" })?;

        parse_url("TARGET_URL", raw_target.clone())?;

        Ok(Self {
            target_url: raw_target,
            scrape_interval: parse_interval(
                lookup,
                "SCRAPE_INTERVAL",
                DEFAULT_PROBE_INTERVAL_SECS,
            )?,
            log_level: parse_log_level(lookup)?,
            metrics_port: parse_or(lookup, "METRICS_PORT", DEFAULT_PROBE_METRICS_PORT)?,
            instance: resolve_instance(lookup),
            system_tag: read(lookup, "PROBE_SYSTEM").unwrap_or_else(|| "prober".to_string()),
            env_tag: read(lookup, "PROBE_ENV").unwrap_or_else(|| "st".to_string()),
        })
    }

    pub fn record_labels(&self) -> RecordLabels {
        RecordLabels {
            instance: self.instance.clone(),
            system: self.system_tag.clone(),
            environment: self.env_tag.clone(),
        }
    }
}

fn resolve_instance(lookup: Lookup<'_>) -> String {
    read(lookup, "INSTANCE_NAME")
        .or_else(|| read(lookup, "HOSTNAME"))
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
