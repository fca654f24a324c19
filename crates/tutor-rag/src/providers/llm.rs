//! LLM provider trait for prompt completion

use async_trait::async_trait;

use crate::error::Result;

/// Opaque prompt-in, text-out capability.
///
/// Implementations:
/// - `OllamaClient`: Local Ollama server
/// - `GeminiClient`: Google Gemini API
///
/// Calls may fail transiently and carry no determinism or latency guarantee.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
