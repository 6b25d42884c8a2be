use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use emerald_models::{ChatRecord, EmeraldError};
use std::collections::HashMap;
use tracing::{info, instrument};

#[async_trait]
pub trait ChatStore: Send + Sync + 'static {
    async fn put(&self, record: &ChatRecord) -> Result<(), EmeraldError>;

    /// Name shown in logs.
    fn name(&self) -> &str;
}

/// Attribute map for one history row.
pub fn record_attributes(record: &ChatRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::from([
        ("PK".to_string(), AttributeValue::S(record.partition_key())),
        ("SK".to_string(), AttributeValue::S(record.sort_key())),
        (
            "UserMessage".to_string(),
            AttributeValue::S(record.user_message.clone()),
        ),
        (
            "AgentResponse".to_string(),
            AttributeValue::S(record.agent_response.clone()),
        ),
        ("Region".to_string(), AttributeValue::S(record.region.clone())),
        ("AgentID".to_string(), AttributeValue::S(record.agent_id.clone())),
        (
            "Timestamp".to_string(),
            AttributeValue::N(record.timestamp().to_string()),
        ),
        (
            "Status".to_string(),
            AttributeValue::S(record.status.as_str().to_string()),
        ),
    ]);
    if let Some(error) = record.error.as_ref().filter(|e| !e.is_empty()) {
        item.insert("Error".to_string(), AttributeValue::S(error.clone()));
    }
    item
}

#[derive(Clone)]
pub struct DynamoChatStore {
    client: Client,
    table: String,
}

impl DynamoChatStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl ChatStore for DynamoChatStore {
    #[instrument(skip(self, record), fields(table = %self.table, session_id = %record.session_id))]
    async fn put(&self, record: &ChatRecord) -> Result<(), EmeraldError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(record_attributes(record)))
            .send()
            .await
            .map_err(|e| EmeraldError::Store {
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        info!("Successfully wrote to DynamoDB table: {}", self.table);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use emerald_models::ChatStatus;

    fn record(error: Option<&str>) -> ChatRecord {
        ChatRecord {
            session_id: "s-1".to_string(),
            written_at: Utc.timestamp_millis_opt(1_700_000_000_500).unwrap(),
            user_message: "hello".to_string(),
            agent_response: "hi there".to_string(),
            region: "us-east-1".to_string(),
            agent_id: "arn:aws:bedrock-agentcore:us-east-1:123:runtime/a".to_string(),
            status: if error.is_some() { ChatStatus::Error } else { ChatStatus::Success },
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn attributes_cover_history_schema() {
        let item = record_attributes(&record(None));
        assert_eq!(item.len(), 8);
        assert_eq!(item["PK"], AttributeValue::S("SESSION#s-1".to_string()));
        assert_eq!(item["SK"], AttributeValue::S("MSG#1700000000500".to_string()));
        assert_eq!(item["Timestamp"], AttributeValue::N("1700000000".to_string()));
        assert_eq!(item["Status"], AttributeValue::S("success".to_string()));
        assert!(!item.contains_key("Error"));
    }

    #[test]
    fn error_attribute_only_when_present() {
        let item = record_attributes(&record(Some("AccessDenied")));
        assert_eq!(item["Status"], AttributeValue::S("error".to_string()));
        assert_eq!(item["Error"], AttributeValue::S("AccessDenied".to_string()));
    }
}
