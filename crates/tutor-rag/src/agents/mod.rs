//! Responders and the router that picks between them

pub mod responder;
pub mod router;
pub mod subject;

use async_trait::async_trait;

use crate::types::{AgentDescriptor, AnswerEnvelope, Mode};

pub use responder::Responder;
pub use router::{Selection, TutorRouter};
pub use subject::Subject;

/// A component that can own the answer to a question
#[async_trait]
pub trait ResponderCapability: Send + Sync {
    /// Fixed identity and tools
    fn descriptor(&self) -> &AgentDescriptor;

    /// Advisory check of whether the question is in this responder's domain
    async fn can_handle(&self, question: &str) -> bool;

    /// Produce the answer. Failures are reported inside the envelope.
    async fn process(&self, question: &str, mode: Mode) -> AnswerEnvelope;
}
