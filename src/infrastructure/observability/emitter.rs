use crate::domain::ports::ResultEmitter;
use crate::domain::probe::ProbeRecord;
use std::io::Write;
use tracing::warn;

/// Writes each probe record as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutEmitter;

impl ResultEmitter for StdoutEmitter {
    fn emit(&self, record: &ProbeRecord<'_>) {
        match serde_json::to_string(record) {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
                    warn!("Failed to write probe record: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize probe record: {}", e),
        }
    }
}
