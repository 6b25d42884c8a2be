use anyhow::Result;
use clap::Parser;
use emerald::{shutdown_signal, ServerArgs};
use emerald_api::AppState;
use emerald_clients::ChatClients;
use emerald_metrics::{MetricsService, TracingService};
use emerald_models::ServiceConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "emerald-service", about = "Emerald chat routing service")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.server.config.as_deref())?;
    cli.server.apply(&mut config.server);

    TracingService::init(&config.logging)?;
    info!("Starting Emerald routing service");
    info!("Configuration loaded: {:?}", config);

    let metrics = Arc::new(MetricsService::new()?);
    let clients = ChatClients::from_config(&config).await;
    let state = AppState::new(config, clients, metrics);

    emerald_api::start_server(state, shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Emerald routing service shutdown complete");
    Ok(())
}
