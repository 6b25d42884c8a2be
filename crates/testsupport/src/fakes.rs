use async_trait::async_trait;
use emerald_clients::{AgentInvoker, ChatStore, MetricsSink};
use emerald_models::{AgentReply, ChatRecord, EmeraldError, MetricEvent};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub struct AgentCall {
    pub agent_id: String,
    pub session_id: String,
    pub message: String,
}

/// Agent that replies with fixed text, or fails with a fixed reason.
#[derive(Clone)]
pub struct ScriptedAgent {
    outcome: Result<String, String>,
    pub calls: Arc<Mutex<Vec<AgentCall>>>,
}

impl ScriptedAgent {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: Arc::default(),
        }
    }

    pub async fn calls(&self) -> Vec<AgentCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AgentInvoker for ScriptedAgent {
    async fn invoke(
        &self,
        agent_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<AgentReply, EmeraldError> {
        self.calls.lock().await.push(AgentCall {
            agent_id: agent_id.to_string(),
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
        match &self.outcome {
            Ok(text) => Ok(AgentReply {
                text: text.clone(),
                content_type: "application/json".to_string(),
            }),
            Err(reason) => Err(EmeraldError::AgentInvocation {
                reason: reason.clone(),
            }),
        }
    }
}

/// History store kept in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub records: Arc<Mutex<Vec<ChatRecord>>>,
    fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Arc::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    pub async fn records(&self) -> Vec<ChatRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn put(&self, record: &ChatRecord) -> Result<(), EmeraldError> {
        if let Some(reason) = &self.fail_with {
            return Err(EmeraldError::Store {
                reason: reason.clone(),
            });
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Metrics sink that keeps every event it is handed.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<MetricEvent>>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            events: Arc::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    pub async fn events(&self) -> Vec<MetricEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn emit(&self, event: &MetricEvent) -> Result<(), EmeraldError> {
        self.events.lock().await.push(event.clone());
        match &self.fail_with {
            Some(reason) => Err(EmeraldError::MetricsDispatch {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}
