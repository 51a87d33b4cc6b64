//! Observability for the probe and SLA daemons
//!
//! 1. **Scrape endpoint**: prometheus registries served over `/metrics`
//! 2. **Structured records**: one JSON line per probe on stdout
//! 3. **Plain logs**: `tracing` to stdout, filtered by `LOG_LEVEL`

pub mod emitter;
pub mod logging;
pub mod metrics;
pub mod server;

pub use emitter::StdoutEmitter;
pub use logging::init_tracing;
pub use metrics::{ProbeMetrics, RenderMetrics, SlaMetrics};
pub use server::MetricsServer;
