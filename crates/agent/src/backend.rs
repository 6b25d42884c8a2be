use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, ConverseOutput, Message};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use emerald_models::{AgentConfig, EmeraldError};
use tracing::{info, instrument};

/// Produces a completion for a single user prompt.
#[async_trait]
pub trait ModelBackend: Send + Sync + 'static {
    async fn complete(&self, prompt: &str) -> Result<String, EmeraldError>;

    fn model_id(&self) -> &str;
}

/// Bedrock foundation model reached through the Converse API.
#[derive(Clone)]
pub struct BedrockConverseBackend {
    client: Client,
    model_id: String,
}

impl BedrockConverseBackend {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub async fn from_config(config: &AgentConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config), config.model.model_id.clone())
    }
}

/// Joins the text blocks of a reply. Reasoning and tool blocks are dropped.
pub fn reply_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

#[async_trait]
impl ModelBackend for BedrockConverseBackend {
    #[instrument(skip(self, prompt), fields(model_id = %self.model_id))]
    async fn complete(&self, prompt: &str) -> Result<String, EmeraldError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| EmeraldError::Model {
                reason: e.to_string(),
            })?;

        let output = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .send()
            .await
            .map_err(|e| EmeraldError::Model {
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        match output.output() {
            Some(ConverseOutput::Message(message)) => {
                info!(stop_reason = ?output.stop_reason(), "Model replied");
                Ok(reply_text(message.content()))
            }
            _ => Err(EmeraldError::Model {
                reason: "model returned no message".to_string(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
