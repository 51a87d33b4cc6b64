use crate::domain::errors::{ProbeError, QueryError, SinkError};
use crate::domain::probe::ProbeRecord;
use crate::domain::sla::SinkSample;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Issues the outbound health-check request.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Returns the response status, whatever it is. Only a missing response is an error.
    async fn get_status(&self, url: &str) -> Result<u16, ProbeError>;
}

/// Range-aggregation backend (Prometheus HTTP API or a stand-in).
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Evaluates `query` at `at` and returns the first sample's value.
    async fn instant_query(&self, query: &str, at: DateTime<Utc>) -> Result<f64, QueryError>;
}

/// External metrics-ingestion endpoint.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn write(&self, token: &str, sample: &SinkSample) -> Result<(), SinkError>;
}

/// Destination of structured probe records.
pub trait ResultEmitter: Send + Sync {
    fn emit(&self, record: &ProbeRecord<'_>);
}
