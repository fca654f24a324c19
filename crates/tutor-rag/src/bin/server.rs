//! Tutor server binary
//!
//! Run with: cargo run -p tutor-rag --bin tutor-rag-server [config.toml]

use std::path::PathBuf;

use tutor_rag::{
    config::{LlmBackend, TutorConfig},
    providers::build_handles,
    server::{state::AppState, TutorServer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                     Tutor RAG System                      ║
║        Multi-agent tutoring over your syllabus            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TutorConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Backend: {:?}", config.llm.backend);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Classification model: {}", config.llm.classify_model);
    tracing::info!("  - Books directory: {}", config.corpus.books_dir.display());

    let llm = build_handles(&config.llm)?;

    match llm.generator.health_check().await {
        Ok(true) => tracing::info!(
            "{} is reachable (model {})",
            llm.generator.name(),
            llm.generator.model()
        ),
        _ => match config.llm.backend {
            LlmBackend::Ollama => {
                tracing::warn!("Ollama not available at {}", config.llm.base_url);
                tracing::warn!("Please start Ollama:");
                tracing::warn!("  1. Start: ollama serve");
                tracing::warn!("  2. Pull the model: ollama pull {}", config.llm.generate_model);
            }
            LlmBackend::Gemini => {
                tracing::warn!("Gemini model {} is not reachable", config.llm.generate_model);
            }
        },
    }

    let state = AppState::with_handles(config.clone(), llm);
    let server = TutorServer::with_state(config, state);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask          - Ask a question (also under /api)");
    println!("  GET  /agents       - List agents");
    println!("  GET  /check-books  - Inspect the books directory");
    println!("  POST /upload-books - Upload syllabus files");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
