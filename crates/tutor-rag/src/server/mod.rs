//! HTTP server for the tutor

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::TutorConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Tutor HTTP server
pub struct TutorServer {
    config: TutorConfig,
    state: AppState,
}

impl TutorServer {
    /// Create a server with providers for the configured backend
    pub fn new(config: TutorConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn with_state(config: TutorConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            // Unprefixed paths used by the browser client
            .merge(routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting tutor server on http://{}", addr);
        tracing::info!("API documentation: http://{}/api/info", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::ScriptedLlm;
    use crate::providers::LlmHandles;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(books: &Path, llm: ScriptedLlm) -> (Router, AppState) {
        let mut config = TutorConfig::default();
        config.corpus.books_dir = books.to_path_buf();
        let state = AppState::with_handles(config.clone(), LlmHandles::shared(Arc::new(llm)));
        let server = TutorServer::with_state(config, state.clone());
        (server.build_router(), state)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask_on_syllabus_with_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), ScriptedLlm::replying("unused"));

        let response = router
            .oneshot(
                Request::post("/api/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"question": "What is torque?", "mode": "on-syllabus"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["agent_used"], "Syllabus Agent");
        assert_eq!(body["sources"], serde_json::json!([]));
        assert!(body["answer"]
            .as_str()
            .unwrap()
            .starts_with("I couldn't find any relevant content"));
    }

    #[tokio::test]
    async fn test_ask_defaults_to_off_syllabus() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), ScriptedLlm::replying("Because of Rayleigh scattering."));

        let response = router
            .oneshot(
                Request::post("/api/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"question": "Why is the sky blue?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["agent_used"], "Tutor Agent");
        assert_eq!(body["answer"], "Because of Rayleigh scattering.");
        assert_eq!(body["tools_used"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_routes_served_without_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), ScriptedLlm::replying("Photosynthesis."));

        let response = router
            .clone()
            .oneshot(
                Request::post("/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"question": "How do plants eat?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Photosynthesis.");

        let response = router
            .oneshot(Request::get("/check-books").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_agents_listing() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), ScriptedLlm::replying("NO"));

        let response = router
            .oneshot(Request::get("/api/agents").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        let agents = body["agents"].as_array().unwrap();
        assert_eq!(agents[0]["name"], "Tutor Agent");
        assert_eq!(agents[0]["tools"], serde_json::json!([]));
        assert_eq!(agents[1]["tools"], serde_json::json!(["calculator"]));
    }

    #[tokio::test]
    async fn test_check_books() {
        let dir = tempfile::tempdir().unwrap();
        let books = dir.path().join("books");

        let (router, _) = app(&books, ScriptedLlm::replying("NO"));
        let response = router
            .oneshot(Request::get("/api/check-books").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["exists"], false);

        std::fs::create_dir(&books).unwrap();
        std::fs::write(books.join("ch1.md"), "# Kinematics").unwrap();
        std::fs::write(books.join("cover.png"), [0u8; 4]).unwrap();

        let (router, _) = app(&books, ScriptedLlm::replying("NO"));
        let response = router
            .oneshot(Request::get("/api/check-books").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["exists"], true);
        assert_eq!(body["message"], "Found 1 supported files in books directory.");
        assert_eq!(body["files"][0]["type"], ".md");
    }

    #[tokio::test]
    async fn test_upload_books() {
        let dir = tempfile::tempdir().unwrap();
        let books = dir.path().join("books");
        let (router, _) = app(&books, ScriptedLlm::replying("NO"));

        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nOhm's law\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"song.mp3\"\r\nContent-Type: audio/mpeg\r\n\r\nID3\r\n\
             --{b}--\r\n",
            b = boundary
        );

        let response = router
            .oneshot(
                Request::post("/api/upload-books")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["uploaded_files"], serde_json::json!(["notes.txt"]));
        assert_eq!(
            body["skipped_files"],
            serde_json::json!(["song.mp3 (unsupported format)"])
        );
        assert_eq!(body["message"], "Successfully uploaded 1 files");
        assert_eq!(
            std::fs::read_to_string(books.join("notes.txt")).unwrap(),
            "Ohm's law"
        );
    }

    #[tokio::test]
    async fn test_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let (router, state) = app(dir.path(), ScriptedLlm::replying("NO"));
        state.set_ready(false);

        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
