use chrono::Utc;
use emerald_clients::ChatClients;
use emerald_metrics::{MetricsService, TracingService};
use emerald_models::{
    ChatRecord, ChatRequest, ChatResponse, ChatStatus, EmeraldError, MetricEvent, ServiceConfig,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

const AGENT_ERROR_PREFIX: &str = "Error invoking agent: ";

/// One chat exchange: agent call, history write, metric event.
///
/// Only a history write failure can fail the request, and only when the
/// store is marked as required. Agent failures are folded into the response
/// with `status = error`.
pub struct ChatService {
    clients: ChatClients,
    metrics: Arc<MetricsService>,
    region: String,
    store_required: bool,
}

struct AgentOutcome {
    text: String,
    status: ChatStatus,
    error: Option<String>,
}

impl ChatService {
    pub fn new(clients: ChatClients, metrics: Arc<MetricsService>, config: &ServiceConfig) -> Self {
        Self {
            clients,
            metrics,
            region: config.aws.region.clone(),
            store_required: config.store.required,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    #[instrument(skip(self, request), fields(session_id = %request.session_id, agent_id = %request.agent_id))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, EmeraldError> {
        let started = Instant::now();
        info!("Received chat request for session {}", request.session_id);

        let outcome = self.invoke_agent(&request).await;

        if let Err(e) = self.write_history(&request, &outcome).await {
            if self.store_required {
                self.metrics
                    .record_chat(ChatStatus::Error, started.elapsed().as_secs_f64() * 1000.0);
                return Err(e);
            }
        }

        self.emit_metric(&request, outcome.status, started).await;

        let processing_time = started.elapsed().as_secs_f64();
        self.metrics
            .record_chat(outcome.status, processing_time * 1000.0);
        TracingService::log_chat_completed(
            &request.session_id,
            &request.agent_id,
            outcome.status,
            processing_time * 1000.0,
        );

        Ok(ChatResponse {
            session_id: request.session_id,
            response: outcome.text,
            processing_time,
            region: self.region.clone(),
            status: outcome.status,
            error: outcome.error,
        })
    }

    async fn invoke_agent(&self, request: &ChatRequest) -> AgentOutcome {
        match self
            .clients
            .agent
            .invoke(&request.agent_id, &request.session_id, &request.message)
            .await
        {
            Ok(reply) => {
                info!(content_type = %reply.content_type, "Successfully received response from agent");
                AgentOutcome {
                    text: reply.text,
                    status: ChatStatus::Success,
                    error: None,
                }
            }
            Err(e) => {
                error!("Agent invocation failed: {}", e);
                self.metrics.record_agent_error();
                let reason = match e {
                    EmeraldError::AgentInvocation { reason } => reason,
                    other => other.to_string(),
                };
                AgentOutcome {
                    text: format!("{}{}", AGENT_ERROR_PREFIX, reason),
                    status: ChatStatus::Error,
                    error: Some(reason),
                }
            }
        }
    }

    async fn write_history(
        &self,
        request: &ChatRequest,
        outcome: &AgentOutcome,
    ) -> Result<(), EmeraldError> {
        let Some(store) = &self.clients.store else {
            return Ok(());
        };

        let record = ChatRecord {
            session_id: request.session_id.clone(),
            written_at: Utc::now(),
            user_message: request.message.clone(),
            agent_response: outcome.text.clone(),
            region: self.region.clone(),
            agent_id: request.agent_id.clone(),
            status: outcome.status,
            error: outcome.error.clone(),
        };

        store.put(&record).await.map_err(|e| {
            self.metrics.record_store_error();
            TracingService::log_store_failure(&request.session_id, store.name(), &e.to_string());
            e
        })
    }

    async fn emit_metric(&self, request: &ChatRequest, status: ChatStatus, started: Instant) {
        let Some(sink) = &self.clients.sink else {
            return;
        };

        let event = MetricEvent::chat(
            &request.session_id,
            &request.agent_id,
            started.elapsed().as_secs_f64(),
            status,
            Utc::now(),
        );

        if let Err(e) = sink.emit(&event).await {
            self.metrics.record_metric_dispatch_error();
            TracingService::log_metric_dispatch_failure(
                &request.session_id,
                sink.name(),
                &e.to_string(),
            );
        }
    }
}
