//! Configuration for the tutoring service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tutor.toml";

/// Main tutor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Text-generation backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Document corpus configuration
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Router configuration
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl TutorConfig {
    /// Load configuration from a TOML file (if any) and apply environment overrides.
    ///
    /// With `None`, `tutor.toml` in the working directory is used when it exists,
    /// otherwise defaults. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.llm.align_models_with_backend();
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TUTOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TUTOR_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid TUTOR_PORT '{}': {}", port, e)))?;
        }
        if let Some(dir) = lookup("TUTOR_BOOKS_DIR") {
            self.corpus.books_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup("TUTOR_LLM_BACKEND") {
            self.llm.backend = match backend.to_lowercase().as_str() {
                "ollama" => LlmBackend::Ollama,
                "gemini" => LlmBackend::Gemini,
                other => {
                    return Err(Error::Config(format!("Unknown LLM backend '{}'", other)));
                }
            };
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("TUTOR_GENERATE_MODEL") {
            self.llm.generate_model = model;
        }
        if let Some(model) = lookup("TUTOR_CLASSIFY_MODEL") {
            self.llm.classify_model = model;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        Ok(())
    }

    /// Check that the configuration can be used to start the service
    pub fn validate(&self) -> Result<()> {
        if self.llm.backend == LlmBackend::Gemini && self.llm.api_key.is_none() {
            return Err(Error::Config(
                "Please set GEMINI_API_KEY to use the gemini backend".to_string(),
            ));
        }
        if self.corpus.excerpt_chars == 0 {
            return Err(Error::Config("corpus.excerpt_chars must be positive".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Text-generation backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Google Gemini API (requires an API key)
    Gemini,
}

/// Default Ollama model for both roles
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

/// Default Gemini model for both roles
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend serves generation and classification
    pub backend: LlmBackend,
    /// Ollama base URL
    pub base_url: String,
    /// API key (Gemini only)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model used for final answers
    pub generate_model: String,
    /// Model used for YES/NO and 1-10 replies
    pub classify_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            generate_model: DEFAULT_OLLAMA_MODEL.to_string(),
            classify_model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Swap untouched Ollama model defaults for Gemini ones when that backend is selected
    pub fn align_models_with_backend(&mut self) {
        if self.backend != LlmBackend::Gemini {
            return;
        }
        for model in [&mut self.generate_model, &mut self.classify_model] {
            if *model == DEFAULT_OLLAMA_MODEL {
                *model = DEFAULT_GEMINI_MODEL.to_string();
            }
        }
    }
}

/// Document corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Root of the syllabus materials
    pub books_dir: PathBuf,
    /// Pages read from a PDF when the extractor exposes page boundaries
    pub max_pdf_pages: u32,
    /// Characters of a relevant document passed as grounding context
    pub excerpt_chars: usize,
    /// Characters shown to the classifier when judging relevance
    pub preview_chars: usize,
    /// Documents longer than this are kept when the relevance call fails
    pub fallback_min_chars: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            books_dir: PathBuf::from("books"),
            max_pdf_pages: 20,
            excerpt_chars: 15_000,
            preview_chars: 800,
            fallback_min_chars: 100,
        }
    }
}

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Minimum winning score for delegating to a specialist
    pub delegate_threshold: f64,
    /// Score substituted when a rating reply is not a number
    pub default_score: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            delegate_threshold: 6.0,
            default_score: 5.0,
        }
    }
}
