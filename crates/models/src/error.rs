use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ErrorShape {
    pub detail: String,
    pub error_type: String,
}

#[derive(Error, Debug)]
pub enum EmeraldError {
    #[error("Agent invocation failed: {reason}")]
    AgentInvocation { reason: String },

    #[error("Database write failed: {reason}")]
    Store { reason: String },

    #[error("Metrics dispatch failed: {reason}")]
    MetricsDispatch { reason: String },

    #[error("Model invocation failed: {reason}")]
    Model { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Internal server error: {reason}")]
    Internal { reason: String },
}

impl EmeraldError {
    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            detail: self.detail(),
            error_type: self.error_type().to_string(),
        }
    }

    /// Client-facing message. Store failures do not leak the backend reason.
    pub fn detail(&self) -> String {
        match self {
            EmeraldError::Store { .. } => "Database write failed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            EmeraldError::AgentInvocation { .. } => "AgentInvocationError",
            EmeraldError::Store { .. } => "StoreError",
            EmeraldError::MetricsDispatch { .. } => "MetricsDispatchError",
            EmeraldError::Model { .. } => "ModelError",
            EmeraldError::InvalidRequest { .. } => "InvalidRequest",
            EmeraldError::Config { .. } => "ConfigError",
            EmeraldError::Internal { .. } => "ServiceException",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            EmeraldError::InvalidRequest { .. } => 400,
            EmeraldError::AgentInvocation { .. } => 500,
            EmeraldError::Store { .. } => 500,
            EmeraldError::MetricsDispatch { .. } => 500,
            EmeraldError::Model { .. } => 500,
            EmeraldError::Config { .. } => 500,
            EmeraldError::Internal { .. } => 500,
        }
    }
}

impl From<figment::Error> for EmeraldError {
    fn from(e: figment::Error) -> Self {
        EmeraldError::Config {
            reason: e.to_string(),
        }
    }
}
