pub mod backend;
pub mod handlers;
pub mod routes;
pub mod state;

pub use backend::*;
pub use handlers::*;
pub use routes::*;
pub use state::*;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use emerald_models::ServerConfig;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn build_app(state: AgentState, server: &ServerConfig) -> Router {
    build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(server.body_limit_bytes())),
    )
}

pub async fn start_server<F>(
    state: AgentState,
    server: ServerConfig,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = server.address();
    let app = build_app(state, &server);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Agent server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
