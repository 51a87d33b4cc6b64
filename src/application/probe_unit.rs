use crate::application::scheduler::Unit;
use crate::domain::ports::{ProbeTransport, ResultEmitter};
use crate::domain::probe::{ProbeRecord, ProbeResult, RecordLabels};
use crate::infrastructure::observability::ProbeMetrics;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// One HTTP health check per tick, recorded as metrics and a JSON record.
pub struct ProbeUnit {
    target: String,
    transport: Arc<dyn ProbeTransport>,
    metrics: ProbeMetrics,
    labels: RecordLabels,
    emitter: Arc<dyn ResultEmitter>,
}

impl ProbeUnit {
    pub fn new(
        target: &str,
        transport: Arc<dyn ProbeTransport>,
        metrics: ProbeMetrics,
        labels: RecordLabels,
        emitter: Arc<dyn ResultEmitter>,
    ) -> Self {
        Self {
            target: target.to_string(),
            transport,
            metrics,
            labels,
            emitter,
        }
    }

    /// Performs the probe and records it. Never fails.
    pub async fn probe(&self) -> ProbeResult {
        let started = Instant::now();
        let timestamp = Utc::now();

        let outcome = self.transport.get_status(&self.target).await;
        let duration = started.elapsed();

        let result = match outcome {
            Ok(status) => ProbeResult::from_status(&self.target, status, duration, timestamp),
            Err(e) => {
                error!("probe error: {}", e);
                ProbeResult::from_error(&self.target, &e, duration, timestamp)
            }
        };

        self.metrics.requests_total.inc();
        self.metrics.duration_seconds.set(duration.as_secs_f64());

        if result.success {
            self.metrics.success_total.inc();
            info!("probe success, duration={:.3}s", duration.as_secs_f64());
        } else {
            self.metrics.failure_total.inc();
            warn!(
                "probe failure, status={:?}, duration={:.3}s",
                result.status_code,
                duration.as_secs_f64()
            );
        }

        self.emitter.emit(&ProbeRecord::new(&result, &self.labels));
        result
    }
}

#[async_trait]
impl Unit for ProbeUnit {
    fn name(&self) -> &'static str {
        "prober"
    }

    async fn run_once(&self) {
        self.probe().await;
    }
}
