//! Prober - periodic HTTP health probe with a Prometheus scrape endpoint
//!
//! Issues one GET against `TARGET_URL` per interval, exports the outcome as
//! counters and a duration gauge, and prints one JSON record per probe.
//!
//! # Usage
//! ```sh
//! TARGET_URL=http://service/health SCRAPE_INTERVAL=30 cargo run --bin prober
//! ```
//!
//! # Environment Variables
//! - `TARGET_URL` - URL to probe (required)
//! - `SCRAPE_INTERVAL` - Seconds between probes (default: 30)
//! - `LOG_LEVEL` - Log level (default: info)
//! - `METRICS_PORT` - Scrape endpoint port (default: 9100)

use anyhow::{Context, Result};
use clap::Parser;
use probewatch::application::{ProbeUnit, Scheduler};
use probewatch::config::{ProberConfig, load_dotenv};
use probewatch::infrastructure::ReqwestProbeTransport;
use probewatch::infrastructure::core::ShutdownSignal;
use probewatch::infrastructure::observability::{
    MetricsServer, ProbeMetrics, StdoutEmitter, init_tracing,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "prober")]
#[command(about = "Periodic HTTP health prober exporting Prometheus metrics")]
struct Args {
    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Run a single probe and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let shutdown = ShutdownSignal::install().context("Failed to install signal handlers")?;
    load_dotenv(args.env_file.as_deref())?;

    let config = ProberConfig::from_env().context("Failed to load prober configuration")?;
    init_tracing(config.log_level);

    info!(
        "Prober {} starting (target: {}, interval: {:?})",
        env!("CARGO_PKG_VERSION"),
        config.target_url,
        config.scrape_interval
    );

    let metrics = ProbeMetrics::new()?;
    let transport = ReqwestProbeTransport::new().context("Failed to create probe client")?;
    let unit = ProbeUnit::new(
        &config.target_url,
        Arc::new(transport),
        metrics.clone(),
        config.record_labels(),
        Arc::new(StdoutEmitter),
    );
    let scheduler = Scheduler::new(config.scrape_interval);

    if args.once {
        scheduler.tick(&unit).await;
        return Ok(());
    }

    info!("Starting prober exporter on port {}", config.metrics_port);
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
