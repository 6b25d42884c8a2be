use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AgentState};

pub fn create_router() -> Router<AgentState> {
    Router::new()
        .route("/invocations", post(invoke_agent))
        .route("/ping", get(ping))
        .route("/metrics", get(metrics))
}

pub fn build_router(state: AgentState) -> Router {
    create_router().with_state(state)
}
