use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// Outbound probes give up after this long.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Aggregation queries give up after this long.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Downstream pushes give up after this long.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(3);

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a client whose every request is bounded by `timeout`.
    ///
    /// No retry layer: each tick issues each call at most once.
    pub fn create_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .user_agent(concat!("probewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| format!("Failed to build HTTP client (timeout {:?})", timeout))
    }
}

/// Renders an error with its source chain, since reqwest's top-level message
/// alone rarely names the cause.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
