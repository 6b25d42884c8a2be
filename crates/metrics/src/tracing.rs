use emerald_models::{ChatStatus, EmeraldError, LogFormat, LoggingConfig};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

pub struct TracingService;

impl TracingService {
    /// Installs the global subscriber. `RUST_LOG` wins over the configured level.
    pub fn init(config: &LoggingConfig) -> Result<(), EmeraldError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .map_err(|e| EmeraldError::Config {
                reason: format!("invalid log level '{}': {}", config.level, e),
            })?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339());

        let installed = match config.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        };

        installed.map_err(|e| EmeraldError::Config {
            reason: e.to_string(),
        })
    }

    pub fn log_chat_completed(
        session_id: &str,
        agent_id: &str,
        status: ChatStatus,
        duration_ms: f64,
    ) {
        match status {
            ChatStatus::Success => info!(
                session_id = %session_id,
                agent_id = %agent_id,
                duration_ms = duration_ms,
                status = %status,
                "Chat completed"
            ),
            ChatStatus::Error => warn!(
                session_id = %session_id,
                agent_id = %agent_id,
                duration_ms = duration_ms,
                status = %status,
                "Chat completed with agent error"
            ),
        }
    }

    pub fn log_store_failure(session_id: &str, table: &str, reason: &str) {
        error!(
            session_id = %session_id,
            table = %table,
            reason = %reason,
            "History write failed"
        );
    }

    pub fn log_metric_dispatch_failure(session_id: &str, function_name: &str, reason: &str) {
        warn!(
            session_id = %session_id,
            function_name = %function_name,
            reason = %reason,
            "Metric event dispatch failed"
        );
    }
}
