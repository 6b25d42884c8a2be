use aws_config::{BehaviorVersion, Region, SdkConfig};
use emerald_models::ServiceConfig;
use std::sync::Arc;
use tracing::info;

use crate::{
    AgentCoreInvoker, AgentInvoker, ChatStore, DynamoChatStore, LambdaMetricsSink, MetricsSink,
    StaticAgent,
};

/// Shared AWS configuration. Credentials come from the default provider chain
/// (environment, profile, container or instance role).
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// The downstream collaborators of the chat flow.
#[derive(Clone)]
pub struct ChatClients {
    pub agent: Arc<dyn AgentInvoker>,
    pub store: Option<Arc<dyn ChatStore>>,
    pub sink: Option<Arc<dyn MetricsSink>>,
}

impl ChatClients {
    pub async fn from_config(config: &ServiceConfig) -> Self {
        let sdk_config = load_sdk_config(&config.aws.region).await;

        let agent: Arc<dyn AgentInvoker> = match &config.agent.static_reply {
            Some(reply) => {
                info!("Agent runtime disabled, answering with a static reply");
                Arc::new(StaticAgent::new(reply.clone()))
            }
            None => Arc::new(AgentCoreInvoker::new(
                aws_sdk_bedrockagentcore::Client::new(&sdk_config),
                config.agent.qualifier.clone(),
            )),
        };

        let store = config.store.table.as_ref().map(|table| {
            info!(table = %table, "History writes enabled");
            Arc::new(DynamoChatStore::new(
                aws_sdk_dynamodb::Client::new(&sdk_config),
                table.clone(),
            )) as Arc<dyn ChatStore>
        });

        let sink = config.metrics.lambda_name.as_ref().map(|name| {
            info!(function_name = %name, "Metric events enabled");
            Arc::new(LambdaMetricsSink::new(
                aws_sdk_lambda::Client::new(&sdk_config),
                name.clone(),
            )) as Arc<dyn MetricsSink>
        });

        Self { agent, store, sink }
    }
}
