#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use probewatch::domain::errors::{ProbeError, QueryError, SinkError};
use probewatch::domain::ports::{MetricSink, MetricsBackend, ProbeTransport, ResultEmitter};
use probewatch::domain::probe::ProbeRecord;
use probewatch::domain::sla::SinkSample;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// Serves `app` on an ephemeral local port.
pub async fn spawn_stub(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Returns scripted outcomes in order, repeating the last one.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<u16, ProbeError>>>,
    last: Mutex<Option<Result<u16, ProbeError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<u16, ProbeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(outcome: Result<u16, ProbeError>) -> Self {
        Self::new(vec![outcome])
    }
}

#[async_trait]
impl ProbeTransport for ScriptedTransport {
    async fn get_status(&self, url: &str) -> Result<u16, ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(outcome) = next {
            *last = Some(outcome);
        }
        last.clone().expect("empty transport script")
    }
}

/// Keeps every emitted record as JSON.
#[derive(Default)]
pub struct CollectingEmitter {
    pub records: Mutex<Vec<serde_json::Value>>,
}

impl ResultEmitter for CollectingEmitter {
    fn emit(&self, record: &ProbeRecord<'_>) {
        let value = serde_json::to_value(record).unwrap();
        self.records.lock().unwrap().push(value);
    }
}

/// Answers queries by expression and remembers what was asked.
#[derive(Default)]
pub struct StubBackend {
    answers: HashMap<String, Result<f64, QueryError>>,
    pub queries: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, expr: &str, outcome: Result<f64, QueryError>) -> Self {
        self.answers.insert(expr.to_string(), outcome);
        self
    }
}

#[async_trait]
impl MetricsBackend for StubBackend {
    async fn instant_query(&self, query: &str, at: DateTime<Utc>) -> Result<f64, QueryError> {
        self.queries.lock().unwrap().push((query.to_string(), at));
        self.answers
            .get(query)
            .cloned()
            .unwrap_or(Err(QueryError::EmptyResult))
    }
}

/// Records writes and replies with a fixed outcome.
pub struct RecordingSink {
    outcome: Result<(), SinkError>,
    pub writes: Mutex<Vec<(String, SinkSample)>>,
}

impl RecordingSink {
    pub fn accepting() -> Self {
        Self::replying(Ok(()))
    }

    pub fn replying(outcome: Result<(), SinkError>) -> Self {
        Self {
            outcome,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn write(&self, token: &str, sample: &SinkSample) -> Result<(), SinkError> {
        self.writes
            .lock()
            .unwrap()
            .push((token.to_string(), sample.clone()));
        self.outcome.clone()
    }
}

/// Formatted log output collected in memory.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.lines_containing(needle).len()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Captures logs from the current thread until the guard is dropped.
/// Use with the default single-threaded test runtime.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
