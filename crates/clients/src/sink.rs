use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client;
use emerald_models::{EmeraldError, MetricEvent};
use tracing::{debug, instrument};

#[async_trait]
pub trait MetricsSink: Send + Sync + 'static {
    async fn emit(&self, event: &MetricEvent) -> Result<(), EmeraldError>;

    fn name(&self) -> &str;
}

/// Delivers metric events to a Lambda function. `InvocationType::Event`
/// queues the call, so this returns once Lambda has accepted the payload.
#[derive(Clone)]
pub struct LambdaMetricsSink {
    client: Client,
    function_name: String,
}

impl LambdaMetricsSink {
    pub fn new(client: Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }
}

#[async_trait]
impl MetricsSink for LambdaMetricsSink {
    #[instrument(skip(self, event), fields(function_name = %self.function_name, session_id = %event.session_id))]
    async fn emit(&self, event: &MetricEvent) -> Result<(), EmeraldError> {
        let payload = serde_json::to_vec(event).map_err(|e| EmeraldError::MetricsDispatch {
            reason: e.to_string(),
        })?;

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| EmeraldError::MetricsDispatch {
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(status_code = output.status_code(), "Metric event accepted");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.function_name
    }
}
