use emerald_metrics::*;
use emerald_models::{ChatStatus, LogFormat, LoggingConfig};

#[test]
fn test_metrics_service_creation() {
    let service = MetricsService::new().unwrap();
    service.record_chat(ChatStatus::Success, 12.0);

    let metrics_text = service.get_prometheus_metrics().unwrap();
    assert!(metrics_text.contains("emerald_chat_requests_total"));
    assert!(metrics_text.contains("emerald_chat_duration_ms"));
}

#[test]
fn test_metric_name_registration() {
    let service = MetricsService::new().unwrap();
    service.record_chat(ChatStatus::Error, 5.0);
    let metrics_text = service.get_prometheus_metrics().unwrap();

    let expected_metrics = [
        "emerald_chat_requests_total",
        "emerald_agent_errors_total",
        "emerald_store_errors_total",
        "emerald_metric_dispatch_errors_total",
        "emerald_chat_duration_ms",
    ];

    for metric in &expected_metrics {
        assert!(metrics_text.contains(metric), "Missing metric: {}", metric);
    }
    assert!(!metrics_text.contains("emerald_model_errors_total"));
}

#[test]
fn test_agent_metrics_are_registered_separately() {
    let metrics = AgentMetrics::new().unwrap();
    metrics.record_invocation();
    metrics.record_invocation();
    metrics.record_model_error();

    assert_eq!(metrics.invocation_count(), 2);
    assert_eq!(metrics.model_error_count(), 1);

    let metrics_text = metrics.get_prometheus_metrics().unwrap();
    assert!(metrics_text.contains("emerald_agent_invocations_total 2"));
    assert!(metrics_text.contains("emerald_model_errors_total 1"));
    assert!(!metrics_text.contains("emerald_chat_requests_total"));
    assert!(!metrics_text.contains("emerald_store_errors_total"));
}

#[test]
fn test_chat_counter_is_labelled_by_status() {
    let service = MetricsService::new().unwrap();
    service.record_chat(ChatStatus::Success, 10.0);
    service.record_chat(ChatStatus::Success, 20.0);
    service.record_chat(ChatStatus::Error, 30.0);

    assert_eq!(service.chat_count(ChatStatus::Success), 2);
    assert_eq!(service.chat_count(ChatStatus::Error), 1);

    let metrics_text = service.get_prometheus_metrics().unwrap();
    assert!(metrics_text.contains("emerald_chat_requests_total{status=\"success\"} 2"));
    assert!(metrics_text.contains("emerald_chat_requests_total{status=\"error\"} 1"));
}

#[test]
fn test_error_counters() {
    let service = MetricsService::new().unwrap();
    service.record_agent_error();
    service.record_store_error();
    service.record_store_error();
    service.record_metric_dispatch_error();

    assert_eq!(service.agent_error_count(), 1);
    assert_eq!(service.store_error_count(), 2);
    assert_eq!(service.metric_dispatch_error_count(), 1);
}

#[test]
fn test_tracing_rejects_invalid_level() {
    // Only meaningful when RUST_LOG is not set by the caller.
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let config = LoggingConfig {
        format: LogFormat::Json,
        level: "emerald=loud".to_string(),
    };
    let err = TracingService::init(&config).unwrap_err();
    assert_eq!(err.error_type(), "ConfigError");
}
