//! Core types for the tutoring service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Document, FileType, RelevantDocument};
pub use query::{AskRequest, Mode};
pub use response::{AgentDescriptor, AnswerEnvelope, ToolsUsed};
