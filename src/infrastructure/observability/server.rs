//! Scrape endpoint for the metrics registries.
//!
//! Exposes:
//! - `GET /metrics` - Prometheus text exposition of the daemon's registry
//! - `GET /health` - liveness of the process itself

use crate::infrastructure::observability::metrics::RenderMetrics;
use anyhow::{Context, Result};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

type SharedMetrics = Arc<dyn RenderMetrics>;

/// Builds the scrape router over one registry.
pub fn router(metrics: SharedMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<SharedMetrics>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", TEXT_FORMAT)],
        metrics.render(),
    )
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// HTTP listener serving the scrape router until cancelled
pub struct MetricsServer {
    listener: TcpListener,
    metrics: SharedMetrics,
}

impl MetricsServer {
    /// Binds on all interfaces at `port`.
    pub async fn bind(port: u16, metrics: SharedMetrics) -> Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind metrics server on {}", addr))?;
        Ok(Self { listener, metrics })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        info!("metrics server listening on http://{}", self.local_addr()?);
        axum::serve(self.listener, router(self.metrics))
            .with_graceful_shutdown(cancel.cancelled_owned())
            .await
            .context("metrics server failed")
    }

    /// Runs the server on a background task.
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.serve(cancel).await {
                tracing::error!("{:#}", e);
            }
        })
    }
}
