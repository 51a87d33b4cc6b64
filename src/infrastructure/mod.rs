pub mod core;
pub mod http_probe;
pub mod observability;
pub mod prometheus_api;
pub mod sage;

pub use http_probe::ReqwestProbeTransport;
pub use prometheus_api::PrometheusApiClient;
pub use sage::SageClient;
