//! Application state for the tutor server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::agents::TutorRouter;
use crate::config::TutorConfig;
use crate::error::Result;
use crate::providers::{build_handles, LlmHandles};
use crate::retrieval::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: TutorConfig,
    /// Router and responders, built once at startup
    router: TutorRouter,
    /// Books directory
    store: DocumentStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with providers for the configured backend
    pub fn new(config: TutorConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            "Initializing tutor state (backend: {:?}, generate: {}, classify: {})",
            config.llm.backend,
            config.llm.generate_model,
            config.llm.classify_model
        );

        let llm = build_handles(&config.llm)?;
        Ok(Self::with_handles(config, llm))
    }

    /// Create state around existing providers
    pub fn with_handles(config: TutorConfig, llm: LlmHandles) -> Self {
        let router = TutorRouter::from_config(&config, llm);
        let store = DocumentStore::new(&config.corpus.books_dir, config.corpus.max_pdf_pages);
        tracing::info!("Books directory: {}", store.root().display());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                router,
                store,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &TutorConfig {
        &self.inner.config
    }

    /// Get the router
    pub fn router(&self) -> &TutorRouter {
        &self.inner.router
    }

    /// Get the document store
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
