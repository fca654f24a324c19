//! Routing of questions to a single responder

use std::fmt;
use std::sync::Arc;

use crate::config::{RoutingConfig, TutorConfig};
use crate::generation::{parse_score, PromptBuilder};
use crate::providers::LlmHandles;
use crate::retrieval::DocumentStore;
use crate::tools::precompute;
use crate::types::{AgentDescriptor, AnswerEnvelope, Mode, ToolsUsed};

use super::responder::Responder;
use super::subject::{
    general_failure_message, Subject, GENERAL_TUTORING, ROUTER_DESCRIPTION, ROUTER_NAME,
};
use super::ResponderCapability;

/// Outcome of responder selection
#[derive(Clone)]
pub enum Selection {
    /// Hand the question to this responder
    Delegate(Arc<dyn ResponderCapability>),
    /// The router answers with the general tutoring prompt
    SelfHandle,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Delegate(responder) => f
                .debug_tuple("Delegate")
                .field(&responder.descriptor().name)
                .finish(),
            Selection::SelfHandle => f.write_str("SelfHandle"),
        }
    }
}

impl Selection {
    /// Name of the selected responder, if any
    pub fn delegate_name(&self) -> Option<&str> {
        match self {
            Selection::Delegate(responder) => Some(responder.descriptor().name.as_str()),
            Selection::SelfHandle => None,
        }
    }
}

/// Picks one responder per request and returns its answer
pub struct TutorRouter {
    descriptor: AgentDescriptor,
    specialists: Vec<Arc<dyn ResponderCapability>>,
    syllabus: Arc<dyn ResponderCapability>,
    llm: LlmHandles,
    routing: RoutingConfig,
}

impl TutorRouter {
    /// Create a router over explicit responders. `specialists` are polled in order.
    pub fn new(
        specialists: Vec<Arc<dyn ResponderCapability>>,
        syllabus: Arc<dyn ResponderCapability>,
        llm: LlmHandles,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            descriptor: AgentDescriptor::new(ROUTER_NAME, ROUTER_DESCRIPTION, &[]),
            specialists,
            syllabus,
            llm,
            routing,
        }
    }

    /// Build the standard math, physics and syllabus responders over the configured corpus
    pub fn from_config(config: &TutorConfig, llm: LlmHandles) -> Self {
        let store = DocumentStore::new(&config.corpus.books_dir, config.corpus.max_pdf_pages);
        let build = |subject: Subject| -> Arc<dyn ResponderCapability> {
            Arc::new(Responder::new(
                subject,
                llm.clone(),
                store.clone(),
                &config.corpus,
            ))
        };

        let specialists = Subject::SPECIALISTS.iter().map(|s| build(*s)).collect();
        let syllabus = build(Subject::GeneralSyllabus);
        Self::new(specialists, syllabus, llm.clone(), config.routing.clone())
    }

    pub fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    /// The router followed by every responder it can delegate to
    pub fn agents(&self) -> Vec<AgentDescriptor> {
        std::iter::once(self.descriptor.clone())
            .chain(self.specialists.iter().map(|r| r.descriptor().clone()))
            .chain(std::iter::once(self.syllabus.descriptor().clone()))
            .collect()
    }

    /// Choose the responder for a question.
    ///
    /// On-syllabus requests always go to the syllabus responder. Otherwise each
    /// specialist that accepts the question is rated 1-10; the first highest
    /// rating in poll order wins if it reaches the delegation threshold.
    pub async fn select(&self, question: &str, mode: Mode) -> Selection {
        if mode.is_grounded() {
            return Selection::Delegate(Arc::clone(&self.syllabus));
        }

        let mut best: Option<(&Arc<dyn ResponderCapability>, f64)> = None;

        for responder in &self.specialists {
            let descriptor = responder.descriptor();
            if !responder.can_handle(question).await {
                tracing::debug!("{} declined", descriptor.name);
                continue;
            }

            let prompt = PromptBuilder::build_confidence_prompt(
                &descriptor.name,
                &descriptor.description,
                question,
            );
            let score = match self.llm.classifier.generate(&prompt).await {
                Ok(reply) => parse_score(&reply).unwrap_or_else(|| {
                    tracing::debug!(
                        "Unparseable rating '{}' for {}, using {}",
                        reply.trim(),
                        descriptor.name,
                        self.routing.default_score
                    );
                    self.routing.default_score
                }),
                Err(e) => {
                    tracing::warn!("Scoring failed for {}: {}", descriptor.name, e);
                    continue;
                }
            };
            tracing::debug!("{} scored {}", descriptor.name, score);

            if best.map_or(true, |(_, top)| score > top) {
                best = Some((responder, score));
            }
        }

        match best {
            Some((responder, score)) if score >= self.routing.delegate_threshold => {
                Selection::Delegate(Arc::clone(responder))
            }
            _ => Selection::SelfHandle,
        }
    }

    /// Answer a question through the selected responder
    pub async fn process(&self, question: &str, mode: Mode) -> AnswerEnvelope {
        let selection = self.select(question, mode).await;
        tracing::info!("Routing ({}) -> {:?}", mode, selection);

        match selection {
            Selection::Delegate(responder) => responder.process(question, mode).await,
            Selection::SelfHandle => self.answer_directly(question).await,
        }
    }

    /// Answer with the router's own prompt. Arithmetic is still pre-computed
    /// here, and `calculator` is reported whenever it ran.
    async fn answer_directly(&self, question: &str) -> AnswerEnvelope {
        let precomputed = precompute(question);
        let prompt = PromptBuilder::build_tutoring_prompt(
            GENERAL_TUTORING.persona,
            question,
            &precomputed.calculations,
            GENERAL_TUTORING.instructions,
        );

        let answer = match self.llm.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{} generation failed: {}", self.descriptor.name, e);
                general_failure_message(&e)
            }
        };

        let mut tools_used = ToolsUsed::new();
        tools_used.extend(&precomputed.tools_used);
        AnswerEnvelope::new(answer, &self.descriptor.name, tools_used, Vec::new())
    }
}
