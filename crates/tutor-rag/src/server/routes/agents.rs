//! Agent catalogue endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::response::AgentListResponse;

/// GET /api/agents - List the router and its responders
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentListResponse> {
    Json(AgentListResponse {
        agents: state.router().agents(),
    })
}
