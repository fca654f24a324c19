//! Subject responder: capability check and answer production

use async_trait::async_trait;

use crate::config::CorpusConfig;
use crate::generation::{parse_yes_no, PromptBuilder};
use crate::providers::LlmHandles;
use crate::retrieval::{search_documents, DocumentStore, RelevanceFilter};
use crate::tools::{precompute, SYLLABUS_SEARCH_TOOL};
use crate::types::{AgentDescriptor, AnswerEnvelope, Mode};

use super::subject::Subject;
use super::ResponderCapability;

/// A responder for one [`Subject`]
pub struct Responder {
    subject: Subject,
    descriptor: AgentDescriptor,
    llm: LlmHandles,
    store: DocumentStore,
    filter: RelevanceFilter,
    excerpt_chars: usize,
}

impl Responder {
    /// Create a responder grounded in `store`
    pub fn new(subject: Subject, llm: LlmHandles, store: DocumentStore, corpus: &CorpusConfig) -> Self {
        let filter = RelevanceFilter::from_config(llm.classifier.clone(), corpus);
        Self {
            subject,
            descriptor: subject.descriptor(),
            llm,
            store,
            filter,
            excerpt_chars: corpus.excerpt_chars,
        }
    }
}

#[async_trait]
impl ResponderCapability for Responder {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn can_handle(&self, question: &str) -> bool {
        let Some((label, criteria)) = self.subject.classification() else {
            return true;
        };

        let prompt = PromptBuilder::build_classification_prompt(question, label, criteria);
        match self.llm.classifier.generate(&prompt).await {
            Ok(reply) => parse_yes_no(&reply),
            Err(e) => {
                tracing::warn!(
                    "{} classification failed, using keywords: {}",
                    self.descriptor.name,
                    e
                );
                self.subject.matches_keywords(question)
            }
        }
    }

    async fn process(&self, question: &str, mode: Mode) -> AnswerEnvelope {
        let precomputed = precompute(question);
        let mut tools_used = precomputed.tools_used.clone();
        let mut sources = Vec::new();

        let prompt = if mode.is_grounded() {
            if self.descriptor.has_tool(SYLLABUS_SEARCH_TOOL) {
                tools_used.record(SYLLABUS_SEARCH_TOOL);
            }

            let documents =
                search_documents(&self.store, &self.filter, question, self.excerpt_chars).await;
            if documents.is_empty() {
                tracing::info!("{}: no relevant syllabus material", self.descriptor.name);
                return AnswerEnvelope::new(
                    self.subject.not_found_message(),
                    &self.descriptor.name,
                    tools_used,
                    sources,
                );
            }

            for doc in &documents {
                if !sources.contains(&doc.filename) {
                    sources.push(doc.filename.clone());
                }
            }

            let style = self.subject.grounded_style();
            PromptBuilder::build_grounded_prompt(
                style.persona,
                question,
                &documents,
                &precomputed.calculations,
                style.instructions,
            )
        } else {
            let style = self.subject.tutoring_style();
            PromptBuilder::build_tutoring_prompt(
                style.persona,
                question,
                &precomputed.calculations,
                style.instructions,
            )
        };

        let answer = match self.llm.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{} generation failed: {}", self.descriptor.name, e);
                self.subject.failure_message(&e)
            }
        };

        AnswerEnvelope::new(answer, &self.descriptor.name, tools_used, sources)
    }
}
