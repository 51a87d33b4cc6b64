//! Windowed success-ratio model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Two counter queries evaluated over the same window at the same instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowQuery {
    pub window: String,
    pub evaluated_at: DateTime<Utc>,
}

impl WindowQuery {
    pub fn new(window: &str, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            window: window.to_string(),
            evaluated_at,
        }
    }

    /// Range-increase expression for `counter` over this window.
    pub fn increase_expr(&self, counter: &str) -> String {
        format!("increase({}[{}])", counter, self.window)
    }
}

/// Counts for one window and, when there was any traffic, the ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaSample {
    pub window: String,
    pub success_count: f64,
    pub failure_count: f64,
    /// `None` means "no data", which is not the same as 0%.
    pub ratio_percent: Option<f64>,
}

impl SlaSample {
    pub fn compute(window: &str, success_count: f64, failure_count: f64) -> Self {
        let success_count = success_count.max(0.0);
        let failure_count = failure_count.max(0.0);
        let total = success_count + failure_count;

        let ratio_percent = if total <= 0.0 {
            None
        } else {
            Some(success_count / total * 100.0)
        };

        Self {
            window: window.to_string(),
            success_count,
            failure_count,
            ratio_percent,
        }
    }

    pub fn total(&self) -> f64 {
        self.success_count + self.failure_count
    }

    pub fn has_data(&self) -> bool {
        self.ratio_percent.is_some()
    }
}

/// Fixed label set attached to every downstream write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkLabels {
    pub group: String,
    pub env: String,
    pub system: String,
    pub service: String,
}

/// Body of one downstream write: `{name, labels, value}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkSample {
    pub name: String,
    pub labels: SinkLabels,
    pub value: f64,
}

/// Accepts Prometheus duration syntax such as `1h`, `30m`, `1h30m` or `500ms`.
pub fn is_valid_window(window: &str) -> bool {
    const UNITS: [&str; 7] = ["ms", "s", "m", "h", "d", "w", "y"];

    let mut rest = window;
    if rest.is_empty() {
        return false;
    }

    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];

        match UNITS.iter().find(|unit| rest.starts_with(*unit)) {
            Some(unit) => rest = &rest[unit.len()..],
            None => return false,
        }
    }
    true
}
