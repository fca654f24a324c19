//! Text-generation provider abstractions
//!
//! Every component receives an [`LlmHandles`] pair at construction: one handle
//! for final answers and one for short YES/NO and 1-10 classification replies.
//! Both may point at the same backend.

pub mod gemini;
pub mod llm;
pub mod ollama;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::{Error, Result};

pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use ollama::OllamaClient;

/// Generation and classification capabilities shared by all responders
#[derive(Clone)]
pub struct LlmHandles {
    /// Produces final answers
    pub generator: Arc<dyn LlmProvider>,
    /// Produces YES/NO and numeric replies
    pub classifier: Arc<dyn LlmProvider>,
}

impl LlmHandles {
    /// Pair two providers
    pub fn new(generator: Arc<dyn LlmProvider>, classifier: Arc<dyn LlmProvider>) -> Self {
        Self {
            generator,
            classifier,
        }
    }

    /// Use one provider for both roles
    pub fn shared(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            generator: Arc::clone(&provider),
            classifier: provider,
        }
    }
}

/// Build the provider pair for the configured backend
pub fn build_handles(config: &LlmConfig) -> Result<LlmHandles> {
    match config.backend {
        LlmBackend::Ollama => {
            let generator = OllamaClient::new(config, config.generate_model.clone())?;
            let classifier = OllamaClient::new(config, config.classify_model.clone())?;
            Ok(LlmHandles::new(Arc::new(generator), Arc::new(classifier)))
        }
        LlmBackend::Gemini => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                Error::Config("Please set GEMINI_API_KEY to use the gemini backend".to_string())
            })?;
            let generator =
                GeminiClient::new(config, api_key.clone(), config.generate_model.clone())?;
            let classifier = GeminiClient::new(config, api_key, config.classify_model.clone())?;
            Ok(LlmHandles::new(Arc::new(generator), Arc::new(classifier)))
        }
    }
}
