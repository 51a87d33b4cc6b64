//! Client for the Prometheus HTTP query API.

use crate::domain::errors::QueryError;
use crate::domain::ports::MetricsBackend;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, QUERY_TIMEOUT, error_chain,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<VectorSample>,
}

#[derive(Debug, Deserialize)]
struct VectorSample {
    /// `[unix_seconds, "value"]`
    value: (f64, String),
}

pub struct PrometheusApiClient {
    client: Client,
    query_url: Url,
}

impl PrometheusApiClient {
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClientFactory::create_client(QUERY_TIMEOUT)?,
            query_url: query_endpoint(base_url)
                .with_context(|| format!("Invalid Prometheus base URL {}", base_url))?,
        })
    }
}

/// `{base}/api/v1/query`, keeping any path prefix on `base`.
fn query_endpoint(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("api/v1/query")
}

fn decode(body: QueryResponse) -> Result<f64, QueryError> {
    if body.status != "success" {
        return Err(QueryError::Backend {
            error_type: body.error_type.unwrap_or_else(|| body.status.clone()),
            error: body.error.unwrap_or_default(),
        });
    }

    let sample = body
        .data
        .and_then(|d| d.result.into_iter().next())
        .ok_or(QueryError::EmptyResult)?;

    let raw = sample.value.1;
    let value: f64 = raw
        .parse()
        .map_err(|_| QueryError::Malformed(format!("sample value {:?} is not a number", raw)))?;
    if !value.is_finite() {
        return Err(QueryError::Malformed(format!(
            "sample value {:?} is not finite",
            raw
        )));
    }
    Ok(value)
}

#[async_trait]
impl MetricsBackend for PrometheusApiClient {
    async fn instant_query(&self, query: &str, at: DateTime<Utc>) -> Result<f64, QueryError> {
        let time = format!("{:.3}", at.timestamp_millis() as f64 / 1000.0);
        debug!("prometheus query {} at {}", query, time);

        let response = self
            .client
            .get(self.query_url.clone())
            .query(&[("query", query), ("time", time.as_str())])
            .send()
            .await
            .map_err(|e| QueryError::Transport(error_chain(&e)))?;

        // Prometheus reports query errors in the JSON body with a 4xx/5xx status.
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| QueryError::Malformed(error_chain(&e)))?;

        decode(body)
    }
}
