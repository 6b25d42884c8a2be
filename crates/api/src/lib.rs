pub mod chat;
pub mod handlers;
pub mod routes;
pub mod state;

pub use chat::*;
pub use handlers::*;
pub use routes::*;
pub use state::*;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Router with the HTTP middleware stack applied.
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes();

    build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

pub async fn start_server<F>(
    state: AppState,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = state.config.server.address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Emerald routing service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
