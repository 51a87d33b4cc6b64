mod common;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use common::{closed_port, spawn_stub};
use probewatch::domain::errors::{QueryError, SinkError};
use probewatch::domain::ports::{MetricSink, MetricsBackend};
use probewatch::domain::sla::{SinkLabels, SinkSample};
use probewatch::infrastructure::{PrometheusApiClient, SageClient};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio_test::assert_ok;
use url::Url;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn prometheus_stub(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().push(params.clone());
    let query = params.get("query").cloned().unwrap_or_default();

    if query.contains("probe_success_total") {
        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {"resultType": "vector", "result": [
                    {"metric": {}, "value": [1772366400.0, "90"]}
                ]}
            })),
        )
    } else if query.contains("probe_failure_total") {
        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {"resultType": "vector", "result": []}
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "unknown metric"
            })),
        )
    }
}

async fn prometheus_client() -> (PrometheusApiClient, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/v1/query", get(prometheus_stub))
        .with_state(seen.clone());
    let addr = spawn_stub(app).await;
    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    (PrometheusApiClient::new(&base).unwrap(), seen)
}

#[tokio::test]
async fn test_prometheus_query_value_and_params() {
    let (client, seen) = prometheus_client().await;
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let value = client
        .instant_query("increase(probe_success_total[1h])", at)
        .await;
    assert_eq!(value, Ok(90.0));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0]["query"], "increase(probe_success_total[1h])");
    let time: f64 = seen[0]["time"].parse().unwrap();
    assert_eq!(time, at.timestamp() as f64);
}

#[tokio::test]
async fn test_prometheus_empty_result() {
    let (client, _) = prometheus_client().await;
    let value = client
        .instant_query("increase(probe_failure_total[1h])", Utc::now())
        .await;
    assert_eq!(value, Err(QueryError::EmptyResult));
}

#[tokio::test]
async fn test_prometheus_error_body_on_400() {
    let (client, _) = prometheus_client().await;
    let value = client.instant_query("nonsense", Utc::now()).await;
    assert_eq!(
        value,
        Err(QueryError::Backend {
            error_type: "bad_data".to_string(),
            error: "unknown metric".to_string(),
        })
    );
}

#[tokio::test]
async fn test_prometheus_unreachable() {
    let addr = closed_port().await;
    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    let client = PrometheusApiClient::new(&base).unwrap();

    let value = client.instant_query("up", Utc::now()).await;
    assert!(matches!(value, Err(QueryError::Transport(_))));
}

#[tokio::test]
async fn test_prometheus_non_json_body() {
    let app = Router::new().route("/api/v1/query", get(|| async { "not json" }));
    let addr = spawn_stub(app).await;
    let client = PrometheusApiClient::new(&Url::parse(&format!("http://{}", addr)).unwrap())
        .unwrap();

    let value = client.instant_query("up", Utc::now()).await;
    assert!(matches!(value, Err(QueryError::Malformed(_))));
}

type Writes = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn sage_stub(
    State(writes): State<Writes>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    writes.lock().unwrap().push((auth, body));
    (StatusCode::OK, String::new())
}

fn sample(value: f64) -> SinkSample {
    SinkSample {
        name: "service_sla_percent".to_string(),
        labels: SinkLabels {
            group: "ab2_islamov".to_string(),
            env: "prod".to_string(),
            system: "sla-app".to_string(),
            service: "oncall".to_string(),
        },
        value,
    }
}

fn sage_client(addr: SocketAddr) -> SageClient {
    SageClient::new(Url::parse(&format!("http://{}/metric", addr)).unwrap()).unwrap()
}

#[tokio::test]
async fn test_sage_put_with_bearer_and_body() {
    let writes: Writes = Arc::default();
    let app = Router::new()
        .route("/sauron/api/Metric", put(sage_stub))
        .with_state(writes.clone());
    let addr = spawn_stub(app).await;
    let url = Url::parse(&format!("http://{}/sauron/api/Metric", addr)).unwrap();
    let client = SageClient::new(url).unwrap();

    assert_ok!(client.write("tok-123", &sample(99.25)).await);

    let writes = writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let (auth, body) = &writes[0];
    assert_eq!(auth.as_deref(), Some("Bearer tok-123"));
    assert_eq!(body["name"], "service_sla_percent");
    assert_eq!(body["value"], 99.25);
    assert_eq!(body["labels"]["group"], "ab2_islamov");
    assert_eq!(body["labels"]["system"], "sla-app");
}

#[tokio::test]
async fn test_sage_non_200_is_rejected_with_body() {
    let app = Router::new().route(
        "/metric",
        put(|| async { (StatusCode::FORBIDDEN, "token expired") }),
    );
    let addr = spawn_stub(app).await;
    let client = sage_client(addr);

    let result = client.write("tok", &sample(10.0)).await;
    assert_eq!(
        result,
        Err(SinkError::Rejected {
            status: 403,
            body: "token expired".to_string(),
        })
    );
}

#[tokio::test]
async fn test_sage_accepted_but_not_200_is_rejected() {
    let app = Router::new().route("/metric", put(|| async { StatusCode::NO_CONTENT }));
    let addr = spawn_stub(app).await;
    let client = sage_client(addr);

    let result = client.write("tok", &sample(10.0)).await;
    assert!(matches!(result, Err(SinkError::Rejected { status: 204, .. })));
}

#[tokio::test]
async fn test_sage_unreachable_is_transport_error() {
    let addr = closed_port().await;
    let client = sage_client(addr);

    let result = client.write("tok", &sample(10.0)).await;
    assert!(matches!(result, Err(SinkError::Transport(_))));
}
