use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use emerald_api::{build_app, AppState};
use emerald_clients::{AgentInvoker, ChatClients, ChatStore, MetricsSink};
use emerald_metrics::MetricsService;
use emerald_models::{ChatStatus, ServiceConfig};
use emerald_testsupport::{MemoryStore, RecordingSink, ScriptedAgent};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

struct Harness {
    app: Router,
    agent: ScriptedAgent,
    store: MemoryStore,
    sink: RecordingSink,
    metrics: Arc<MetricsService>,
}

fn harness_with(agent: ScriptedAgent, store: MemoryStore, sink: RecordingSink, required: bool) -> Harness {
    let mut config = ServiceConfig::default();
    config.aws.region = "eu-central-1".to_string();
    config.store.required = required;

    let clients = ChatClients {
        agent: Arc::new(agent.clone()) as Arc<dyn AgentInvoker>,
        store: Some(Arc::new(store.clone()) as Arc<dyn ChatStore>),
        sink: Some(Arc::new(sink.clone()) as Arc<dyn MetricsSink>),
    };
    let metrics = Arc::new(MetricsService::new().unwrap());
    let state = AppState::new(config, clients, metrics.clone());

    Harness {
        app: build_app(state),
        agent,
        store,
        sink,
        metrics,
    }
}

fn harness(agent: ScriptedAgent) -> Harness {
    harness_with(agent, MemoryStore::new(), RecordingSink::new(), false)
}

fn chat_request(body: Value) -> Request<Body> {
    Request::post("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_region() {
    let h = harness(ScriptedAgent::replying("unused"));

    let res = h
        .app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({"status": "healthy", "region": "eu-central-1"})
    );
}

#[tokio::test]
async fn chat_success_round_trip() {
    let h = harness(ScriptedAgent::replying("Hello from the agent"));

    let res = h
        .app
        .clone()
        .oneshot(chat_request(json!({
            "session_id": "session-0001",
            "message": "hi",
            "agent_id": "arn:aws:bedrock-agentcore:eu-central-1:123456789012:runtime/emerald"
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["session_id"], "session-0001");
    assert_eq!(body["response"], "Hello from the agent");
    assert_eq!(body["status"], "success");
    assert_eq!(body["region"], "eu-central-1");
    assert!(body["error"].is_null());
    assert!(body["processing_time"].as_f64().unwrap() >= 0.0);

    let calls = h.agent.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].session_id, "session-0001");
    assert_eq!(calls[0].message, "hi");

    let records = h.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].partition_key(), "SESSION#session-0001");
    assert!(records[0].sort_key().starts_with("MSG#"));
    assert_eq!(records[0].agent_response, "Hello from the agent");
    assert_eq!(records[0].region, "eu-central-1");
    assert_eq!(records[0].status, ChatStatus::Success);

    let events = h.sink.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "chat_metric");
    assert_eq!(events[0].session_id, "session-0001");
    assert_eq!(events[0].status, ChatStatus::Success);

    assert_eq!(h.metrics.chat_count(ChatStatus::Success), 1);
}

#[tokio::test]
async fn missing_session_id_gets_generated() {
    let h = harness(ScriptedAgent::replying("ok"));

    let res = h
        .app
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let session_id = body["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 36);
    assert_eq!(h.agent.calls().await[0].session_id, session_id);
}

#[tokio::test]
async fn missing_message_is_unprocessable() {
    let h = harness(ScriptedAgent::replying("ok"));

    let res = h
        .app
        .oneshot(chat_request(json!({"agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.agent.calls().await.is_empty());
    assert!(h.store.records().await.is_empty());
}

#[tokio::test]
async fn agent_failure_is_reported_in_body() {
    let h = harness(ScriptedAgent::failing("AccessDeniedException: not allowed"));

    let res = h
        .app
        .oneshot(chat_request(json!({"session_id": "s-err", "message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "AccessDeniedException: not allowed");
    assert_eq!(
        body["response"],
        "Error invoking agent: AccessDeniedException: not allowed"
    );

    let records = h.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ChatStatus::Error);
    assert_eq!(records[0].error.as_deref(), Some("AccessDeniedException: not allowed"));

    assert_eq!(h.sink.events().await[0].status, ChatStatus::Error);
    assert_eq!(h.metrics.agent_error_count(), 1);
    assert_eq!(h.metrics.chat_count(ChatStatus::Error), 1);
}

#[tokio::test]
async fn store_failure_is_absorbed_by_default() {
    let h = harness_with(
        ScriptedAgent::replying("still here"),
        MemoryStore::failing("ProvisionedThroughputExceededException"),
        RecordingSink::new(),
        false,
    );

    let res = h
        .app
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["response"], "still here");
    assert_eq!(body["status"], "success");
    assert_eq!(h.metrics.store_error_count(), 1);
    assert_eq!(h.sink.events().await.len(), 1);
}

#[tokio::test]
async fn required_store_failure_is_500() {
    let h = harness_with(
        ScriptedAgent::replying("lost"),
        MemoryStore::failing("ResourceNotFoundException"),
        RecordingSink::new(),
        true,
    );

    let res = h
        .app
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body["detail"], "Database write failed");
    assert_eq!(body["error_type"], "StoreError");
    assert!(h.sink.events().await.is_empty());
}

#[tokio::test]
async fn metric_sink_failure_does_not_change_response() {
    let h = harness_with(
        ScriptedAgent::replying("fine"),
        MemoryStore::new(),
        RecordingSink::failing("TooManyRequestsException"),
        false,
    );

    let res = h
        .app
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["response"], "fine");
    assert_eq!(h.metrics.metric_dispatch_error_count(), 1);
    assert_eq!(h.store.records().await.len(), 1);
}

#[tokio::test]
async fn history_and_metrics_are_optional() {
    let clients = ChatClients {
        agent: Arc::new(ScriptedAgent::replying("solo")),
        store: None,
        sink: None,
    };
    let state = AppState::new(
        ServiceConfig::default(),
        clients,
        Arc::new(MetricsService::new().unwrap()),
    );

    let res = build_app(state)
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["response"], "solo");
    assert_eq!(body["region"], "us-east-1");
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let h = harness(ScriptedAgent::replying("ok"));

    h.app
        .clone()
        .oneshot(chat_request(json!({"message": "hi", "agent_id": "arn:a"})))
        .await
        .unwrap();

    let res = h
        .app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("emerald_chat_requests_total{status=\"success\"} 1"));
}
