use axum::{extract::State, http::StatusCode, response::Json};
use emerald_models::{InvocationRequest, InvocationResponse, PingResponse};
use tracing::{error, info, instrument};

use crate::AgentState;

/// Runs the prompt through the model. A failing model echoes the prompt back
/// so the caller still gets a well-formed response.
#[instrument(skip(state, request), fields(prompt_len = request.prompt.len()))]
pub async fn invoke_agent(
    State(state): State<AgentState>,
    Json(request): Json<InvocationRequest>,
) -> Json<InvocationResponse> {
    state.metrics.record_invocation();
    match state.backend.complete(&request.prompt).await {
        Ok(output) => {
            info!(model_id = %state.backend.model_id(), "Agent invocation succeeded");
            Json(InvocationResponse { output })
        }
        Err(e) => {
            error!("Agent invocation failed: {}", e);
            state.metrics.record_model_error();
            Json(InvocationResponse {
                output: request.prompt,
            })
        }
    }
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::healthy())
}

pub async fn metrics(State(state): State<AgentState>) -> Result<String, StatusCode> {
    state.metrics.get_prometheus_metrics().map_err(|e| {
        error!("Failed to get metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
