//! Corpus retrieval: directory walk, relevance filtering and grounding search

pub mod relevance;
pub mod search;
pub mod store;

pub use relevance::{Relevance, RelevanceFilter};
pub use search::search_documents;
pub use store::DocumentStore;
