use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use emerald_models::{
    ChatResponse, HealthResponse, InvocationRequest, InvocationResponse, PingResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "emerald-cli")]
#[command(about = "CLI tool for the Emerald routing service and agent server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "EMERALD_ENDPOINT", default_value = "http://localhost:80")]
    endpoint: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the routing service health
    Health,
    /// Send a chat message through the routing service
    Chat {
        /// Agent runtime ARN
        #[arg(long)]
        agent_id: String,
        /// Message text
        #[arg(long)]
        message: String,
        /// Session to continue; a new one is created when omitted
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Check the agent server health
    Ping,
    /// Send a prompt straight to an agent server
    Invoke {
        /// Prompt text
        prompt: String,
    },
}

fn url(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        error!("Request failed with {}: {}", status, error_text);
        bail!("request failed with {}: {}", status, error_text);
    }
    Ok(response.json().await?)
}

async fn health(client: &Client, endpoint: &str) -> Result<()> {
    let health: HealthResponse = read_json(client.get(url(endpoint, "/health")).send().await?).await?;
    println!("{} ({})", health.status, health.region);
    Ok(())
}

async fn chat(
    client: &Client,
    endpoint: &str,
    agent_id: String,
    message: String,
    session_id: Option<String>,
) -> Result<()> {
    let mut body = serde_json::json!({ "agent_id": agent_id, "message": message });
    if let Some(session_id) = session_id {
        body["session_id"] = session_id.into();
    }
    debug!("Sending chat request: {}", body);

    let response: ChatResponse =
        read_json(client.post(url(endpoint, "/chat")).json(&body).send().await?).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn ping(client: &Client, endpoint: &str) -> Result<()> {
    let ping: PingResponse = read_json(client.get(url(endpoint, "/ping")).send().await?).await?;
    println!("{}", ping.status);
    Ok(())
}

async fn invoke(client: &Client, endpoint: &str, prompt: String) -> Result<()> {
    let request = InvocationRequest { prompt };
    let response: InvocationResponse = read_json(
        client
            .post(url(endpoint, "/invocations"))
            .json(&request)
            .send()
            .await?,
    )
    .await?;
    println!("{}", response.output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Health => health(&client, &cli.endpoint).await?,
        Commands::Chat {
            agent_id,
            message,
            session_id,
        } => chat(&client, &cli.endpoint, agent_id, message, session_id).await?,
        Commands::Ping => ping(&client, &cli.endpoint).await?,
        Commands::Invoke { prompt } => invoke(&client, &cli.endpoint, prompt).await?,
    }

    Ok(())
}
