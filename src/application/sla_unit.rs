//! Windowed SLA ratio from two counter queries.
//!
//! Each tick queries success and failure increases over the same window at the
//! same instant. A missing value counts as zero for the sum but is logged
//! apart from a real zero. With no traffic at all the gauge keeps its previous
//! value and nothing is pushed.

use crate::application::downstream::DownstreamPush;
use crate::application::scheduler::Unit;
use crate::domain::errors::QueryError;
use crate::domain::ports::MetricsBackend;
use crate::domain::sla::{SlaSample, WindowQuery};
use crate::infrastructure::observability::SlaMetrics;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct SlaUnit {
    backend: Arc<dyn MetricsBackend>,
    window: String,
    success_metric: String,
    failure_metric: String,
    metrics: SlaMetrics,
    downstream: DownstreamPush,
}

impl SlaUnit {
    pub fn new(
        backend: Arc<dyn MetricsBackend>,
        window: &str,
        success_metric: &str,
        failure_metric: &str,
        metrics: SlaMetrics,
        downstream: DownstreamPush,
    ) -> Self {
        Self {
            backend,
            window: window.to_string(),
            success_metric: success_metric.to_string(),
            failure_metric: failure_metric.to_string(),
            metrics,
            downstream,
        }
    }

    /// Computes, exports and forwards the ratio as of `now`.
    pub async fn evaluate(&self, now: DateTime<Utc>) -> SlaSample {
        let query = WindowQuery::new(&self.window, now);

        let success = self.read_count(&query, &self.success_metric).await;
        let failure = self.read_count(&query, &self.failure_metric).await;

        let sample = SlaSample::compute(&query.window, success, failure);
        let Some(ratio) = sample.ratio_percent else {
            info!("no data for SLA window={}", self.window);
            return sample;
        };

        self.metrics.sla_percent.set(ratio);
        info!(
            "SLA window={} success={:.1} failure={:.1} -> SLA={:.3}%",
            self.window, sample.success_count, sample.failure_count, ratio
        );

        self.downstream.push(ratio).await;
        sample
    }

    /// One counter increase, or 0.0 when the backend has nothing usable.
    async fn read_count(&self, query: &WindowQuery, counter: &str) -> f64 {
        let expr = query.increase_expr(counter);
        match self.backend.instant_query(&expr, query.evaluated_at).await {
            Ok(value) => value,
            Err(e) if e.is_empty_result() => {
                info!("no series for {}, counting as 0", expr);
                0.0
            }
            Err(e @ QueryError::Backend { .. }) => {
                error!("prometheus error response for {}: {}", expr, e);
                0.0
            }
            Err(e) => {
                warn!("prometheus request error for {}: {}", expr, e);
                0.0
            }
        }
    }
}

#[async_trait]
impl Unit for SlaUnit {
    fn name(&self) -> &'static str {
        "sla-calculator"
    }

    async fn run_once(&self) {
        self.evaluate(Utc::now()).await;
    }
}
