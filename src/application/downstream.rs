//! Best-effort forwarding of one computed value to the ingestion endpoint.

use crate::config::SinkConfig;
use crate::domain::errors::SinkError;
use crate::domain::ports::MetricSink;
use crate::domain::sla::{SinkLabels, SinkSample};
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to one push attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// No token configured; nothing was sent.
    Disabled,
    Delivered,
    Failed(SinkError),
}

pub struct DownstreamPush {
    token: Option<String>,
    sink: Arc<dyn MetricSink>,
    metric_name: String,
    labels: SinkLabels,
}

impl DownstreamPush {
    pub fn new(
        token: Option<String>,
        sink: Arc<dyn MetricSink>,
        metric_name: &str,
        labels: SinkLabels,
    ) -> Self {
        Self {
            token,
            sink,
            metric_name: metric_name.to_string(),
            labels,
        }
    }

    pub fn from_config(config: &SinkConfig, sink: Arc<dyn MetricSink>) -> Self {
        Self::new(
            config.token.clone(),
            sink,
            &config.metric_name,
            config.labels.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Sends `value` once. Failures are logged here and reported as data.
    pub async fn push(&self, value: f64) -> PushOutcome {
        let Some(token) = self.token.as_deref() else {
            return PushOutcome::Disabled;
        };

        let sample = SinkSample {
            name: self.metric_name.clone(),
            labels: self.labels.clone(),
            value,
        };

        match self.sink.write(token, &sample).await {
            Ok(()) => {
                debug!("pushed {}={:.3} downstream", self.metric_name, value);
                PushOutcome::Delivered
            }
            Err(e) => {
                match &e {
                    SinkError::Rejected { status, body } => warn!(
                        "failed to push {} downstream: status={} body={}",
                        self.metric_name, status, body
                    ),
                    SinkError::Transport(msg) => warn!(
                        "error while pushing {} downstream: {}",
                        self.metric_name, msg
                    ),
                }
                PushOutcome::Failed(e)
            }
        }
    }
}
