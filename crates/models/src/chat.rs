use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CHAT_METRIC_TYPE: &str = "chat_metric";

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    #[serde(default = "new_session_id")]
    pub session_id: String,
    pub message: String,
    pub agent_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Success,
    Error,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Success => "success",
            ChatStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    /// Seconds spent handling the request.
    pub processing_time: f64,
    pub region: String,
    pub status: ChatStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub region: String,
}

impl HealthResponse {
    pub fn healthy(region: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            region: region.into(),
        }
    }
}

/// One exchange as written to the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRecord {
    pub session_id: String,
    pub written_at: DateTime<Utc>,
    pub user_message: String,
    pub agent_response: String,
    pub region: String,
    pub agent_id: String,
    pub status: ChatStatus,
    pub error: Option<String>,
}

impl ChatRecord {
    pub fn partition_key(&self) -> String {
        format!("SESSION#{}", self.session_id)
    }

    pub fn sort_key(&self) -> String {
        format!("MSG#{}", self.written_at.timestamp_millis())
    }

    pub fn timestamp(&self) -> i64 {
        self.written_at.timestamp()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub session_id: String,
    pub agent_id: String,
    /// Seconds since the request arrived.
    pub latency: f64,
    pub status: ChatStatus,
    pub timestamp: i64,
}

impl MetricEvent {
    pub fn chat(
        session_id: &str,
        agent_id: &str,
        latency: f64,
        status: ChatStatus,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: CHAT_METRIC_TYPE.to_string(),
            session_id: session_id.to_string(),
            agent_id: agent_id.to_string(),
            latency,
            status,
            timestamp: at.timestamp(),
        }
    }
}
