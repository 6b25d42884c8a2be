use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::EmeraldError;

pub const ENV_PREFIX: &str = "EMERALD_";
/// `EMERALD_*` variables read by the CLI rather than the servers.
const CLI_ONLY_VARS: &[&str] = &["ENDPOINT"];
pub const SERVICE_CONFIG_PATHS: &[&str] = &["configs/service.toml", "config/service.toml"];
pub const AGENT_CONFIG_PATHS: &[&str] = &["configs/agent.toml", "config/agent.toml"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub agent: AgentRuntimeConfig,
    pub store: StoreConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_request_body_size_kb: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        usize::try_from(self.max_request_body_size_kb.saturating_mul(1024)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentRuntimeConfig {
    /// Endpoint qualifier passed with every runtime invocation.
    pub qualifier: String,
    /// When set the agent runtime is never called and this text is returned instead.
    #[serde(default)]
    pub static_reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// History table. `None` (or empty) disables history writes.
    #[serde(default)]
    pub table: Option<String>,
    /// Fail the request with 500 when the history write fails.
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    #[serde(default)]
    pub lambda_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 80,
                max_request_body_size_kb: 1024,
            },
            aws: AwsConfig::default(),
            agent: AgentRuntimeConfig {
                qualifier: "DEFAULT".to_string(),
                static_reply: None,
            },
            store: StoreConfig {
                table: Some("EmeraldGlobalStore".to_string()),
                required: false,
            },
            metrics: MetricsConfig { lambda_name: None },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
                max_request_body_size_kb: 1024,
            },
            aws: AwsConfig::default(),
            model: ModelConfig {
                model_id: "openai.gpt-oss-120b-1:0".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

/// Maps a bare deployment variable (e.g. `DYNAMODB_TABLE`) onto a nested key.
fn deployment_var(var: &'static str, key: &'static str) -> Env {
    Env::raw().only(&[var]).map(move |_| key.into())
}

fn resolve_path(explicit: Option<&Path>, candidates: &[&str]) -> Result<Option<PathBuf>, EmeraldError> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(EmeraldError::Config {
            reason: format!("config file not found: {}", path.display()),
        }),
        None => Ok(candidates
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServiceConfig {
    /// Defaults, then the TOML file, then `EMERALD_*`, then the deployment variables.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ServiceConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(CLI_ONLY_VARS).split("__"))
            .merge(deployment_var("AWS_REGION", "aws.region"))
            .merge(deployment_var("DYNAMODB_TABLE", "store.table"))
            .merge(deployment_var("METRICS_LAMBDA_NAME", "metrics.lambda_name"))
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, EmeraldError> {
        let file = resolve_path(explicit, SERVICE_CONFIG_PATHS)?;
        let config: ServiceConfig = Self::figment(file.as_deref()).extract()?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.store.table = non_empty(self.store.table);
        self.metrics.lambda_name = non_empty(self.metrics.lambda_name);
        self.agent.static_reply = self.agent.static_reply.filter(|r| !r.is_empty());
        self
    }
}

impl AgentConfig {
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AgentConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(CLI_ONLY_VARS).split("__"))
            .merge(deployment_var("AWS_REGION", "aws.region"))
            .merge(deployment_var("AGENT_MODEL_ID", "model.model_id"))
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, EmeraldError> {
        let file = resolve_path(explicit, AGENT_CONFIG_PATHS)?;
        Ok(Self::figment(file.as_deref()).extract()?)
    }
}
