use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use emerald_models::{ChatRequest, ChatResponse, EmeraldError, ErrorShape, HealthResponse};
use tracing::{error, instrument};

use crate::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

fn error_response(e: &EmeraldError) -> (StatusCode, Json<ErrorShape>) {
    (
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(e.to_error_shape()),
    )
}

/// Load balancer health check.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.chat.region()))
}

#[instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorShape>)> {
    match state.chat.handle(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Chat request failed: {}", e);
            Err(error_response(&e))
        }
    }
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.get_prometheus_metrics() {
        Ok(body) => Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body)),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(error_response(&e))
        }
    }
}
