//! Prometheus metrics definitions for both daemons.
//!
//! Each daemon owns one registry, handed to its unit at construction and to
//! the scrape server for rendering. Counters and gauges are atomic, so the
//! scrape server can read while the unit writes.

use prometheus::{Counter, Gauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Anything the scrape endpoint can render
pub trait RenderMetrics: Send + Sync {
    fn render(&self) -> String;
}

fn encode(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

/// Metrics written by the probe unit
#[derive(Clone)]
pub struct ProbeMetrics {
    registry: Arc<Registry>,
    /// Probes attempted
    pub requests_total: Counter,
    /// Probes classified successful
    pub success_total: Counter,
    /// Probes classified failed
    pub failure_total: Counter,
    /// Duration of the most recent probe
    pub duration_seconds: Gauge,
}

impl ProbeMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = Counter::with_opts(Opts::new(
            "probe_requests_total",
            "Total count of probe runs",
        ))?;
        registry.register(Box::new(requests_total.clone()))?;

        let success_total = Counter::with_opts(Opts::new(
            "probe_success_total",
            "Total count of successful probe runs",
        ))?;
        registry.register(Box::new(success_total.clone()))?;

        let failure_total = Counter::with_opts(Opts::new(
            "probe_failure_total",
            "Total count of failed probe runs",
        ))?;
        registry.register(Box::new(failure_total.clone()))?;

        let duration_seconds = Gauge::with_opts(Opts::new(
            "probe_duration_seconds",
            "Duration of last probe run in seconds",
        ))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            success_total,
            failure_total,
            duration_seconds,
        })
    }
}

impl RenderMetrics for ProbeMetrics {
    fn render(&self) -> String {
        encode(&self.registry)
    }
}

/// Metrics written by the SLA unit
#[derive(Clone)]
pub struct SlaMetrics {
    registry: Arc<Registry>,
    /// Most recently computed SLA ratio, percent
    pub sla_percent: Gauge,
}

impl SlaMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let sla_percent = Gauge::with_opts(Opts::new(
            "service_sla_percent",
            "Calculated SLA for target service over window",
        ))?;
        registry.register(Box::new(sla_percent.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            sla_percent,
        })
    }
}

impl RenderMetrics for SlaMetrics {
    fn render(&self) -> String {
        encode(&self.registry)
    }
}
