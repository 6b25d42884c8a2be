use emerald_models::EmeraldError;
use prometheus::{IntCounter, Registry};

use crate::service::{encode_registry, registry_error};

/// Metrics of the agent server.
pub struct AgentMetrics {
    registry: Registry,
    invocations_total: IntCounter,
    model_errors_total: IntCounter,
}

impl AgentMetrics {
    pub fn new() -> Result<Self, EmeraldError> {
        let registry = Registry::new();

        let invocations_total = IntCounter::new(
            "emerald_agent_invocations_total",
            "Total number of prompts received by the agent server",
        )
        .map_err(registry_error)?;

        let model_errors_total = IntCounter::new(
            "emerald_model_errors_total",
            "Total number of failed model calls",
        )
        .map_err(registry_error)?;

        registry
            .register(Box::new(invocations_total.clone()))
            .map_err(registry_error)?;
        registry
            .register(Box::new(model_errors_total.clone()))
            .map_err(registry_error)?;

        Ok(Self {
            registry,
            invocations_total,
            model_errors_total,
        })
    }

    pub fn record_invocation(&self) {
        self.invocations_total.inc();
    }

    pub fn record_model_error(&self) {
        self.model_errors_total.inc();
    }

    pub fn invocation_count(&self) -> u64 {
        self.invocations_total.get()
    }

    pub fn model_error_count(&self) -> u64 {
        self.model_errors_total.get()
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, EmeraldError> {
        encode_registry(&self.registry)
    }
}
