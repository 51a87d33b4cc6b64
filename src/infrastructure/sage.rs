//! Sage metric ingestion client.

use crate::domain::errors::SinkError;
use crate::domain::ports::MetricSink;
use crate::domain::sla::SinkSample;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, PUSH_TIMEOUT, error_chain,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

pub struct SageClient {
    client: Client,
    url: Url,
}

impl SageClient {
    pub fn new(url: Url) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClientFactory::create_client(PUSH_TIMEOUT)?,
            url,
        })
    }
}

#[async_trait]
impl MetricSink for SageClient {
    async fn write(&self, token: &str, sample: &SinkSample) -> Result<(), SinkError> {
        let response = self
            .client
            .put(self.url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .json(sample)
            .send()
            .await
            .map_err(|e| SinkError::Transport(error_chain(&e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected { status, body });
        }
        Ok(())
    }
}
