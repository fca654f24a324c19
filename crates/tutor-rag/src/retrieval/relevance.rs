//! Layered relevance check for grounding documents

use std::sync::Arc;

use crate::config::CorpusConfig;
use crate::generation::{parse_yes_no, PromptBuilder};
use crate::providers::LlmProvider;
use crate::types::Document;

/// Question terms that switch on the storage/database topic rule
pub const TOPIC_TRIGGER_TERMS: [&str; 6] = ["storage", "disk", "raid", "ssd", "database", "memory"];

/// Document terms accepted by the storage/database topic rule
pub const TOPIC_CONTENT_TERMS: [&str; 9] = [
    "storage",
    "disk",
    "memory",
    "database",
    "raid",
    "ssd",
    "flash",
    "magnetic",
    "performance",
];

/// Why a document was judged relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// This many question words occur in the text (0 when the question had none)
    Keywords(usize),
    /// Storage/database vocabulary on both sides
    TopicTerms,
    /// The classifier answered YES
    Classifier,
    /// The classifier failed and the document is long enough to keep
    ContentFallback,
}

/// Decides whether a document may ground an answer
pub struct RelevanceFilter {
    classifier: Arc<dyn LlmProvider>,
    preview_chars: usize,
    fallback_min_chars: usize,
}

impl RelevanceFilter {
    /// Create a filter with explicit limits
    pub fn new(
        classifier: Arc<dyn LlmProvider>,
        preview_chars: usize,
        fallback_min_chars: usize,
    ) -> Self {
        Self {
            classifier,
            preview_chars,
            fallback_min_chars,
        }
    }

    /// Create a filter using the corpus limits
    pub fn from_config(classifier: Arc<dyn LlmProvider>, config: &CorpusConfig) -> Self {
        Self::new(classifier, config.preview_chars, config.fallback_min_chars)
    }

    /// Whether `document` is relevant to `question`
    pub async fn is_relevant(&self, question: &str, document: &Document) -> bool {
        self.check(question, document).await.is_some()
    }

    /// Run the checks in order and report the first that accepts the document
    pub async fn check(&self, question: &str, document: &Document) -> Option<Relevance> {
        let content = document.content.to_lowercase();

        let matches = keyword_matches(question, &content);
        if let Some(count) = matches {
            tracing::debug!(
                "{} relevant by keyword matching ({} matches)",
                document.filename,
                count
            );
            return Some(Relevance::Keywords(count));
        }

        if topic_terms_match(question, &content) {
            tracing::debug!("{} relevant by storage/database terms", document.filename);
            return Some(Relevance::TopicTerms);
        }

        let prompt = PromptBuilder::build_relevance_prompt(
            question,
            &document.filename,
            document.head(self.preview_chars),
        );

        match self.classifier.generate(&prompt).await {
            Ok(reply) if parse_yes_no(&reply) => {
                tracing::debug!("{} relevant by classifier", document.filename);
                Some(Relevance::Classifier)
            }
            Ok(_) => {
                tracing::debug!("{} not relevant", document.filename);
                None
            }
            Err(e) => {
                tracing::warn!("Relevance check failed for {}: {}", document.filename, e);
                if document.size > self.fallback_min_chars {
                    tracing::debug!(
                        "Including {} due to substantial content ({} chars)",
                        document.filename,
                        document.size
                    );
                    Some(Relevance::ContentFallback)
                } else {
                    None
                }
            }
        }
    }
}

/// Count question words (longer than two characters) found in `content`.
///
/// `None` when words exist but none matched; a question with no such words
/// matches trivially.
fn keyword_matches(question: &str, content_lower: &str) -> Option<usize> {
    let words: Vec<String> = question
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > 2)
        .collect();

    if words.is_empty() {
        return Some(0);
    }

    let count = words
        .iter()
        .filter(|word| content_lower.contains(word.as_str()))
        .count();
    (count >= 1).then_some(count)
}

fn topic_terms_match(question: &str, content_lower: &str) -> bool {
    let question = question.to_lowercase();
    TOPIC_TRIGGER_TERMS.iter().any(|term| question.contains(term))
        && TOPIC_CONTENT_TERMS.iter().any(|term| content_lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::ScriptedLlm;
    use crate::types::FileType;
    use std::path::PathBuf;

    fn doc(name: &str, content: &str) -> Document {
        Document::new(PathBuf::from(name), FileType::Txt, content.to_string())
    }

    fn filter(llm: &Arc<ScriptedLlm>) -> RelevanceFilter {
        RelevanceFilter::new(llm.clone(), 800, 100)
    }

    #[tokio::test]
    async fn test_keyword_match_skips_classifier() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let document = doc("notes.txt", "Momentum is conserved in collisions.");

        let result = filter(&llm).check("explain momentum", &document).await;

        assert_eq!(result, Some(Relevance::Keywords(1)));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_words_only_is_trivially_relevant() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let document = doc("a.txt", "anything");

        let result = filter(&llm).check("is it ok", &document).await;

        assert_eq!(result, Some(Relevance::Keywords(0)));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_topic_terms() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let document = doc("hw.txt", "Flash cells wear out.");

        let result = filter(&llm).check("ssd?", &document).await;

        assert_eq!(result, Some(Relevance::TopicTerms));
    }

    #[tokio::test]
    async fn test_classifier_decides_when_heuristics_miss() {
        let document = doc("kinematics.txt", "Objects in free fall accelerate uniformly.");

        let yes = Arc::new(ScriptedLlm::replying(" yes \n"));
        assert_eq!(
            filter(&yes).check("describe gravity", &document).await,
            Some(Relevance::Classifier)
        );
        assert!(yes.prompts()[0].contains("Document: kinematics.txt"));

        let no = Arc::new(ScriptedLlm::replying("NO"));
        assert_eq!(filter(&no).check("describe gravity", &document).await, None);

        let hedged = Arc::new(ScriptedLlm::replying("Yes, probably."));
        assert_eq!(filter(&hedged).check("describe gravity", &document).await, None);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_on_length() {
        let llm = Arc::new(ScriptedLlm::failing("quota exceeded"));
        let long = doc("long.txt", &"a".repeat(101));
        let short = doc("short.txt", &"a".repeat(100));

        assert_eq!(
            filter(&llm).check("describe gravity", &long).await,
            Some(Relevance::ContentFallback)
        );
        assert_eq!(filter(&llm).check("describe gravity", &short).await, None);
    }

    #[tokio::test]
    async fn test_repeated_checks_agree() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let document = doc("waves.txt", "Standing waves form on strings.");
        let filter = filter(&llm);

        let first = filter.is_relevant("what about light?", &document).await;
        let second = filter.is_relevant("what about light?", &document).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_preview_is_bounded() {
        let llm = Arc::new(ScriptedLlm::replying("NO"));
        let document = doc("big.txt", &format!("{}{}", "x".repeat(800), "TAIL"));

        filter(&llm).check("describe gravity", &document).await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains(&"x".repeat(800)));
        assert!(!prompt.contains("TAIL"));
    }
}
