//! Grounding search: walk the corpus and keep relevant excerpts

use crate::types::RelevantDocument;

use super::relevance::RelevanceFilter;
use super::store::DocumentStore;

/// Collect an excerpt of every document the filter accepts for `question`.
///
/// Extraction runs on the blocking pool; documents are then judged one at a
/// time, in walk order. Each excerpt is the first `excerpt_chars` characters
/// of the extracted text.
pub async fn search_documents(
    store: &DocumentStore,
    filter: &RelevanceFilter,
    question: &str,
    excerpt_chars: usize,
) -> Vec<RelevantDocument> {
    let documents = match store.documents().await {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!("Corpus extraction failed: {}", e);
            return Vec::new();
        }
    };

    let mut relevant = Vec::new();
    for document in documents {
        match filter.check(question, &document).await {
            Some(reason) => {
                tracing::debug!("Added {} to relevant content ({:?})", document.filename, reason);
                relevant.push(RelevantDocument::from_document(&document, excerpt_chars));
            }
            None => tracing::debug!("{} not considered relevant", document.filename),
        }
    }

    tracing::info!(
        "Found {} relevant documents in {}",
        relevant.len(),
        store.root().display()
    );
    relevant
}
