//! API routes for the tutor server

pub mod agents;
pub mod ask;
pub mod books;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask_question))
        .route("/agents", get(agents::list_agents))
        .route("/check-books", get(books::check_books))
        .route(
            "/upload-books",
            post(books::upload_books).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "tutor-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-agent tutor with syllabus-grounded answers",
        "endpoints": {
            "POST /api/ask": "Ask a question ({question, mode: on-syllabus | off-syllabus})",
            "GET /api/agents": "List the router and its responders",
            "GET /api/check-books": "List supported files in the books directory",
            "POST /api/upload-books": "Upload syllabus files (multipart field 'files')"
        }
    }))
}
