use anyhow::Result;
use clap::Parser;
use emerald::{shutdown_signal, ServerArgs};
use emerald_agent::{AgentState, BedrockConverseBackend};
use emerald_metrics::{AgentMetrics, TracingService};
use emerald_models::AgentConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "emerald-agent", about = "Emerald agent server")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AgentConfig::load(cli.server.config.as_deref())?;
    cli.server.apply(&mut config.server);

    TracingService::init(&config.logging)?;
    info!(model_id = %config.model.model_id, "Starting Emerald agent server");

    let metrics = Arc::new(AgentMetrics::new()?);
    let backend = Arc::new(BedrockConverseBackend::from_config(&config).await);
    let state = AgentState::new(backend, metrics);

    emerald_agent::start_server(state, config.server.clone(), shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Emerald agent server shutdown complete");
    Ok(())
}
