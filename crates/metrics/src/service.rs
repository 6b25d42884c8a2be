use emerald_models::{ChatStatus, EmeraldError};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::debug;

pub(crate) fn registry_error(e: prometheus::Error) -> EmeraldError {
    EmeraldError::Internal {
        reason: e.to_string(),
    }
}

/// Metrics of the routing service.
pub struct MetricsService {
    registry: Registry,
    chat_requests_total: IntCounterVec,
    agent_errors_total: IntCounter,
    store_errors_total: IntCounter,
    metric_dispatch_errors_total: IntCounter,
    chat_duration_ms: Histogram,
}

impl MetricsService {
    pub fn new() -> Result<Self, EmeraldError> {
        let registry = Registry::new();

        let chat_requests_total = IntCounterVec::new(
            Opts::new("emerald_chat_requests_total", "Total number of chat requests"),
            &["status"],
        )
        .map_err(registry_error)?;

        let agent_errors_total = IntCounter::new(
            "emerald_agent_errors_total",
            "Total number of failed agent runtime invocations",
        )
        .map_err(registry_error)?;

        let store_errors_total = IntCounter::new(
            "emerald_store_errors_total",
            "Total number of failed history writes",
        )
        .map_err(registry_error)?;

        let metric_dispatch_errors_total = IntCounter::new(
            "emerald_metric_dispatch_errors_total",
            "Total number of metric events that could not be delivered",
        )
        .map_err(registry_error)?;

        let chat_duration_ms = Histogram::with_opts(
            HistogramOpts::new(
                "emerald_chat_duration_ms",
                "Chat request processing time in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0, 60000.0,
            ]),
        )
        .map_err(registry_error)?;

        registry
            .register(Box::new(chat_requests_total.clone()))
            .map_err(registry_error)?;
        registry
            .register(Box::new(agent_errors_total.clone()))
            .map_err(registry_error)?;
        registry
            .register(Box::new(store_errors_total.clone()))
            .map_err(registry_error)?;
        registry
            .register(Box::new(metric_dispatch_errors_total.clone()))
            .map_err(registry_error)?;
        registry
            .register(Box::new(chat_duration_ms.clone()))
            .map_err(registry_error)?;

        Ok(Self {
            registry,
            chat_requests_total,
            agent_errors_total,
            store_errors_total,
            metric_dispatch_errors_total,
            chat_duration_ms,
        })
    }

    pub fn record_chat(&self, status: ChatStatus, duration_ms: f64) {
        self.chat_requests_total
            .with_label_values(&[status.as_str()])
            .inc();
        self.chat_duration_ms.observe(duration_ms);
        debug!(status = %status, duration_ms, "Recorded chat request");
    }

    pub fn record_agent_error(&self) {
        self.agent_errors_total.inc();
    }

    pub fn record_store_error(&self) {
        self.store_errors_total.inc();
    }

    pub fn record_metric_dispatch_error(&self) {
        self.metric_dispatch_errors_total.inc();
    }

    pub fn chat_count(&self, status: ChatStatus) -> u64 {
        self.chat_requests_total
            .with_label_values(&[status.as_str()])
            .get()
    }

    pub fn agent_error_count(&self) -> u64 {
        self.agent_errors_total.get()
    }

    pub fn store_error_count(&self) -> u64 {
        self.store_errors_total.get()
    }

    pub fn metric_dispatch_error_count(&self) -> u64 {
        self.metric_dispatch_errors_total.get()
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, EmeraldError> {
        encode_registry(&self.registry)
    }
}

/// Renders a registry in the prometheus text exposition format.
pub(crate) fn encode_registry(registry: &Registry) -> Result<String, EmeraldError> {
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(registry_error)?;

    String::from_utf8(buffer).map_err(|e| EmeraldError::Internal {
        reason: e.to_string(),
    })
}
