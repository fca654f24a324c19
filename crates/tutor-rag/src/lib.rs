//! tutor-rag: multi-agent tutoring service with syllabus-grounded answers
//!
//! A [`TutorRouter`](agents::TutorRouter) picks one responder per question
//! (math, physics, or the syllabus responder for grounded requests), the
//! responder optionally grounds its prompt in documents from the books
//! directory, and the answer comes back as an [`AnswerEnvelope`] naming the
//! responder, the tools it used and the files it cited.

pub mod agents;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod tools;
pub mod types;

pub use agents::{ResponderCapability, Selection, Subject, TutorRouter};
pub use config::TutorConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Document, FileType, RelevantDocument},
    query::{AskRequest, Mode},
    response::{AgentDescriptor, AnswerEnvelope, ToolsUsed},
};
