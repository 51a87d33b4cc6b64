//! Probe outcomes and the structured record emitted for each one.

use crate::domain::errors::ProbeError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Event name carried by every structured probe record
pub const PROBE_RESULT_EVENT: &str = "probe_result";

/// A probe succeeds only on a 2xx status.
pub fn is_success_status(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

/// Outcome of one probe tick. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub target: String,
    pub success: bool,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

impl ProbeResult {
    /// A response was received; any status is recorded, only 2xx counts as success.
    pub fn from_status(
        target: &str,
        status_code: u16,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.to_string(),
            success: is_success_status(status_code),
            status_code: Some(status_code),
            error: None,
            duration,
            timestamp,
        }
    }

    /// No response was received at all.
    pub fn from_error(
        target: &str,
        error: &ProbeError,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.to_string(),
            success: false,
            status_code: None,
            error: Some(error.to_string()),
            duration,
            timestamp,
        }
    }

    /// Duration in milliseconds rounded to three decimals.
    pub fn duration_ms(&self) -> f64 {
        (self.duration.as_secs_f64() * 1_000_000.0).round() / 1000.0
    }
}

/// Static tags stamped on every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLabels {
    pub instance: String,
    pub system: String,
    pub environment: String,
}

/// One machine-parsable line per probe tick
#[derive(Debug, Serialize)]
pub struct ProbeRecord<'a> {
    pub event: &'static str,
    pub target: &'a str,
    pub ok: bool,
    pub status_code: Option<u16>,
    pub error: Option<&'a str>,
    pub duration_ms: f64,
    pub inst: &'a str,
    pub system: &'a str,
    pub env: &'a str,
}

impl<'a> ProbeRecord<'a> {
    pub fn new(result: &'a ProbeResult, labels: &'a RecordLabels) -> Self {
        Self {
            event: PROBE_RESULT_EVENT,
            target: &result.target,
            ok: result.success,
            status_code: result.status_code,
            error: result.error.as_deref(),
            duration_ms: result.duration_ms(),
            inst: &labels.instance,
            system: &labels.system,
            env: &labels.environment,
        }
    }
}
