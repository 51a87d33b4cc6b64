use crate::domain::errors::ProbeError;
use crate::domain::ports::ProbeTransport;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, PROBE_TIMEOUT, error_chain,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Plain GET probe over reqwest.
pub struct ReqwestProbeTransport {
    client: Client,
}

impl ReqwestProbeTransport {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClientFactory::create_client(timeout)?,
        })
    }
}

fn classify(err: reqwest::Error) -> ProbeError {
    let message = error_chain(&err);
    if err.is_timeout() {
        ProbeError::Timeout(message)
    } else if err.is_connect() {
        ProbeError::Connect(message)
    } else {
        ProbeError::Request(message)
    }
}

#[async_trait]
impl ProbeTransport for ReqwestProbeTransport {
    async fn get_status(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        Ok(response.status().as_u16())
    }
}
