//! Scripted provider for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::llm::LlmProvider;

/// Reply for prompts containing a marker
enum Rule {
    Reply(String),
    Fail(String),
}

/// Answers prompts by the first rule whose marker the prompt contains
pub(crate) struct ScriptedLlm {
    rules: Vec<(String, Rule)>,
    fallback: Rule,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    /// Provider answering `fallback` to everything
    pub(crate) fn replying(fallback: &str) -> Self {
        Self {
            rules: Vec::new(),
            fallback: Rule::Reply(fallback.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Provider failing every call
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            rules: Vec::new(),
            fallback: Rule::Fail(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply `reply` to prompts containing `marker`
    pub(crate) fn on(mut self, marker: &str, reply: &str) -> Self {
        self.rules
            .push((marker.to_string(), Rule::Reply(reply.to_string())));
        self
    }

    /// Fail prompts containing `marker`
    pub(crate) fn fail_on(mut self, marker: &str, message: &str) -> Self {
        self.rules
            .push((marker.to_string(), Rule::Fail(message.to_string())));
        self
    }

    /// Number of calls made
    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Prompts received, in order
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());

        let rule = self
            .rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, rule)| rule)
            .unwrap_or(&self.fallback);

        match rule {
            Rule::Reply(text) => Ok(text.clone()),
            Rule::Fail(message) => Err(Error::llm(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
