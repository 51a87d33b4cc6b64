use thiserror::Error;

/// Errors raised while reading process configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {key}")]
    Missing { key: &'static str },

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Transport-level failures of a single outbound probe
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Reasons an aggregation query yields no usable value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("query transport error: {0}")]
    Transport(String),

    #[error("backend returned {error_type}: {error}")]
    Backend { error_type: String, error: String },

    #[error("query matched no series")]
    EmptyResult,

    #[error("malformed query response: {0}")]
    Malformed(String),
}

impl QueryError {
    /// True when the query succeeded but matched nothing.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, QueryError::EmptyResult)
    }
}

/// Failures of a downstream push
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink rejected write: status={status} body={body}")]
    Rejected { status: u16, body: String },

    #[error("sink transport error: {0}")]
    Transport(String),
}
