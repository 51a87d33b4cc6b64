//! SLA calculator - rolling success ratio from Prometheus counters
//!
//! Every interval, queries the increase of the probe success and failure
//! counters over `SLA_WINDOW`, exports the ratio as `service_sla_percent` and,
//! when `SAGE_TOKEN` is set, forwards it to Sage.
//!
//! # Usage
//! ```sh
//! PROMETHEUS_API_URL=http://prometheus:9090 SLA_WINDOW=1h cargo run --bin sla-calculator
//! ```
//!
//! # Environment Variables
//! - `PROMETHEUS_API_URL` - Prometheus base URL
//! - `SCRAPE_INTERVAL` - Seconds between evaluations (default: 60)
//! - `LOG_LEVEL` - Log level (default: info)
//! - `METRICS_PORT` - Scrape endpoint port (default: 9101)
//! - `SLA_WINDOW` - Aggregation window (default: 1h)
//! - `SAGE_TOKEN` - Bearer token for Sage; push disabled when unset

use anyhow::{Context, Result};
use clap::Parser;
use probewatch::application::{DownstreamPush, Scheduler, SlaUnit};
use probewatch::config::{SlaConfig, load_dotenv};
use probewatch::infrastructure::core::ShutdownSignal;
use probewatch::infrastructure::observability::{MetricsServer, SlaMetrics, init_tracing};
use probewatch::infrastructure::{PrometheusApiClient, SageClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sla-calculator")]
#[command(about = "Computes a rolling SLA ratio from Prometheus and exports it")]
struct Args {
    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Run a single evaluation and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let shutdown = ShutdownSignal::install().context("Failed to install signal handlers")?;
    load_dotenv(args.env_file.as_deref())?;

    let config = SlaConfig::from_env().context("Failed to load SLA configuration")?;
    init_tracing(config.log_level);

    info!(
        "SLA calculator {} starting (backend: {}, window: {})",
        env!("CARGO_PKG_VERSION"),
        config.prometheus_api_url,
        config.window
    );
    if !config.sink.is_enabled() {
        info!("SAGE_TOKEN not set, downstream push disabled");
    }

    let metrics = SlaMetrics::new()?;
    let backend = PrometheusApiClient::new(&config.prometheus_api_url)
        .context("Failed to create Prometheus client")?;
    let sink = SageClient::new(config.sink.url.clone()).context("Failed to create Sage client")?;
    let downstream = DownstreamPush::from_config(&config.sink, Arc::new(sink));

    let unit = SlaUnit::new(
        Arc::new(backend),
        &config.window,
        &config.success_metric,
        &config.failure_metric,
        metrics.clone(),
        downstream,
    );
    let scheduler = Scheduler::new(config.scrape_interval);

    if args.once {
        scheduler.tick(&unit).await;
        return Ok(());
    }

    info!(
        "Starting SLA exporter on port {} (window={})",
        config.metrics_port, config.window
    );
    let server = MetricsServer::bind(config.metrics_port, Arc::new(metrics)).await?;
    let cancel = scheduler.cancellation_token();
    server.spawn(cancel.clone());

    tokio::select! {
        _ = scheduler.run(&unit) => {}
        _ = shutdown.recv() => {
            println!("Terminating");
            cancel.cancel();
        }
    }

    Ok(())
}
