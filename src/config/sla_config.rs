//! SLA calculator configuration.
//!
//! Besides the query settings this carries the downstream sink settings. An
//! absent `SAGE_TOKEN` turns the push off entirely.

use super::{Lookup, env_lookup, parse_interval, parse_log_level, parse_or, parse_url, read};
use crate::domain::errors::ConfigError;
use crate::domain::sla::{SinkLabels, is_valid_window};
use std::time::Duration;
use tracing::Level;
use url::Url;

pub const DEFAULT_SLA_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SLA_METRICS_PORT: u16 = 9101;
pub const DEFAULT_PROMETHEUS_API_URL: &str =
    "http://prometheus-server.monitoring.svc.cluster.local:9090";
pub const DEFAULT_SAGE_METRIC_URL: &str = "https://sage.sre-ab.ru/sauron/api/Metric";
pub const DEFAULT_SLA_WINDOW: &str = "1h";
pub const SLA_METRIC_NAME: &str = "service_sla_percent";

/// Downstream ingestion settings
#[derive(Clone)]
pub struct SinkConfig {
    pub token: Option<String>,
    pub url: Url,
    pub labels: SinkLabels,
    pub metric_name: String,
}

impl std::fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url.as_str())
            .field("labels", &self.labels)
            .field("metric_name", &self.metric_name)
            .finish()
    }
}

impl SinkConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let url = read(lookup, "SAGE_METRIC_URL")
            .unwrap_or_else(|| DEFAULT_SAGE_METRIC_URL.to_string());

        Ok(Self {
            token: read(lookup, "SAGE_TOKEN"),
            url: parse_url("SAGE_METRIC_URL", url)?,
            labels: SinkLabels {
                group: read(lookup, "SAGE_GROUP").unwrap_or_else(|| "ab2_islamov".to_string()),
                env: read(lookup, "SAGE_ENV").unwrap_or_else(|| "prod".to_string()),
                system: read(lookup, "SAGE_SYSTEM").unwrap_or_else(|| "sla-app".to_string()),
                service: read(lookup, "SAGE_SERVICE").unwrap_or_else(|| "oncall".to_string()),
            },
            metric_name: SLA_METRIC_NAME.to_string(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

/// SLA calculator environment configuration
#[derive(Debug, Clone)]
pub struct SlaConfig {
    pub prometheus_api_url: Url,
    pub scrape_interval: Duration,
    pub log_level: Level,
    pub metrics_port: u16,
    pub window: String,
    pub success_metric: String,
    pub failure_metric: String,
    pub sink: SinkConfig,
}

impl SlaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let api_url = read(lookup, "PROMETHEUS_API_URL")
            .unwrap_or_else(|| DEFAULT_PROMETHEUS_API_URL.to_string());

        let window = read(lookup, "SLA_WINDOW").unwrap_or_else(|| DEFAULT_SLA_WINDOW.to_string());
        if !is_valid_window(&window) {
            return Err(ConfigError::Invalid {
                key: "SLA_WINDOW",
                value: window,
                reason: "expected a duration such as 1h, 30m or 7d".to_string(),
            });
        }

        Ok(Self {
            prometheus_api_url: parse_url("PROMETHEUS_API_URL", api_url)?,
            scrape_interval: parse_interval(lookup, "SCRAPE_INTERVAL", DEFAULT_SLA_INTERVAL_SECS)?,
            log_level: parse_log_level(lookup)?,
            metrics_port: parse_or(lookup, "METRICS_PORT", DEFAULT_SLA_METRICS_PORT)?,
            window,
            success_metric: read(lookup, "SLA_SUCCESS_METRIC")
                .unwrap_or_else(|| "probe_success_total".to_string()),
            failure_metric: read(lookup, "SLA_FAILURE_METRIC")
                .unwrap_or_else(|| "probe_failure_total".to_string()),
            sink: SinkConfig::from_lookup(lookup)?,
        })
    }
}
