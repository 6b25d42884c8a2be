use async_trait::async_trait;
use aws_sdk_bedrockagentcore::error::DisplayErrorContext;
use aws_sdk_bedrockagentcore::primitives::Blob;
use aws_sdk_bedrockagentcore::Client;
use emerald_models::{AgentReply, EmeraldError, InvocationRequest};
use tracing::{info, instrument};

use crate::decode::decode_agent_payload;

#[async_trait]
pub trait AgentInvoker: Send + Sync + 'static {
    async fn invoke(
        &self,
        agent_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<AgentReply, EmeraldError>;
}

/// JSON body understood by the agent server: `{"prompt": "..."}`.
pub fn prompt_payload(message: &str) -> Result<Vec<u8>, EmeraldError> {
    serde_json::to_vec(&InvocationRequest {
        prompt: message.to_string(),
    })
    .map_err(|e| EmeraldError::Internal {
        reason: format!("failed to encode agent payload: {}", e),
    })
}

/// Bedrock AgentCore runtime. `agent_id` is the runtime ARN.
#[derive(Clone)]
pub struct AgentCoreInvoker {
    client: Client,
    qualifier: String,
}

impl AgentCoreInvoker {
    pub fn new(client: Client, qualifier: impl Into<String>) -> Self {
        Self {
            client,
            qualifier: qualifier.into(),
        }
    }
}

#[async_trait]
impl AgentInvoker for AgentCoreInvoker {
    #[instrument(skip(self, message), fields(qualifier = %self.qualifier))]
    async fn invoke(
        &self,
        agent_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<AgentReply, EmeraldError> {
        info!("Invoking agent runtime");
        let payload = prompt_payload(message)?;

        let output = self
            .client
            .invoke_agent_runtime()
            .agent_runtime_arn(agent_id)
            .qualifier(&self.qualifier)
            .runtime_session_id(session_id)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| EmeraldError::AgentInvocation {
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let content_type = output.content_type().to_string();

        let body = output
            .response
            .collect()
            .await
            .map_err(|e| EmeraldError::AgentInvocation {
                reason: format!("failed to read agent response: {}", e),
            })?
            .into_bytes();

        info!(content_type = %content_type, bytes = body.len(), "Received agent response");
        Ok(AgentReply {
            text: decode_agent_payload(&content_type, &body),
            content_type,
        })
    }
}

/// Answers every message with the same text. Used when the deployment has no
/// agent runtime wired up yet.
#[derive(Clone, Debug)]
pub struct StaticAgent {
    reply: String,
}

impl StaticAgent {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl AgentInvoker for StaticAgent {
    async fn invoke(
        &self,
        _agent_id: &str,
        _session_id: &str,
        _message: &str,
    ) -> Result<AgentReply, EmeraldError> {
        Ok(AgentReply {
            text: self.reply.clone(),
            content_type: "text/plain".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_payload_matches_agent_contract() {
        let payload = prompt_payload("what is \"rust\"?").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value, serde_json::json!({"prompt": "what is \"rust\"?"}));
    }

    #[tokio::test]
    async fn static_agent_ignores_input() {
        let agent = StaticAgent::new("I'm an ai agent, not a doctor.");
        let reply = agent.invoke("arn:a", "s-1", "diagnose me").await.unwrap();
        assert_eq!(reply.text, "I'm an ai agent, not a doctor.");
        assert_eq!(reply.content_type, "text/plain");
    }
}
