//! Question endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerEnvelope, AskRequest};

/// POST /api/ask - Route a question and return the answer envelope
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerEnvelope>> {
    let start = Instant::now();
    tracing::info!("Question ({}): \"{}\"", request.mode, request.question);

    let envelope = state.router().process(&request.question, request.mode).await;

    tracing::info!(
        "Answered by {} in {}ms (tools: {:?}, sources: {})",
        envelope.agent_used,
        start.elapsed().as_millis(),
        envelope.tools_used.as_slice(),
        envelope.sources.len()
    );
    Ok(Json(envelope))
}
