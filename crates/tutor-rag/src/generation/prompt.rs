//! Prompt templates for routing, relevance and answering

use crate::tools::Calculation;
use crate::types::RelevantDocument;

/// Prompt builder for tutor queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// YES/NO check of whether a question belongs to a subject
    pub fn build_classification_prompt(question: &str, subject: &str, criteria: &[&str]) -> String {
        format!(
            r#"Analyze this question and determine if it's primarily a {subject} question.

Question: "{question}"

A {subject} question includes:
{criteria}

Respond with only "YES" if this is primarily a {subject} question, or "NO" if it's not."#,
            subject = subject,
            question = question,
            criteria = Self::bullets(criteria),
        )
    }

    /// 1-10 suitability rating of a responder for a question
    pub fn build_confidence_prompt(agent_name: &str, description: &str, question: &str) -> String {
        format!(
            r#"Rate how well suited the "{agent_name}" is for this question on a scale of 1-10.

Question: "{question}"
Agent specialty: {description}

Consider:
- How closely the question matches the agent's expertise
- Whether the question requires specialized knowledge in this domain
- If this agent would provide the most accurate and helpful answer

Respond with only a number from 1-10."#,
            agent_name = agent_name,
            question = question,
            description = description,
        )
    }

    /// Lenient YES/NO check of whether a document could help
    pub fn build_relevance_prompt(question: &str, filename: &str, preview: &str) -> String {
        format!(
            r#"Could this document help answer the question: "{question}"?

Document: {filename}
Content preview: {preview}...

Be generous - if there's ANY connection, even loose, respond YES.
Respond with only "YES" if it could be helpful, "NO" if completely unrelated."#,
            question = question,
            filename = filename,
            preview = preview,
        )
    }

    /// Answer restricted to the supplied syllabus materials
    pub fn build_grounded_prompt(
        persona: &str,
        question: &str,
        documents: &[RelevantDocument],
        calculations: &[Calculation],
        instructions: &[&str],
    ) -> String {
        format!(
            r#"{persona} Answer this question using ONLY the information provided from the syllabus materials below. Do not use external knowledge.

Question: {question}

Syllabus Materials:
{materials}
{calculations}
Instructions:
- Answer based ONLY on the provided syllabus materials
- If the answer isn't fully covered in the materials, clearly state what information is missing
{instructions}"#,
            persona = persona,
            question = question,
            materials = Self::build_context(documents),
            calculations = Self::format_calculations(calculations),
            instructions = Self::bullets(instructions),
        )
    }

    /// General-knowledge tutoring answer
    pub fn build_tutoring_prompt(
        persona: &str,
        question: &str,
        calculations: &[Calculation],
        instructions: &[&str],
    ) -> String {
        format!(
            r#"{persona}

Question: {question}
{calculations}
Instructions:
{instructions}"#,
            persona = persona,
            question = question,
            calculations = Self::format_calculations(calculations),
            instructions = Self::bullets(instructions),
        )
    }

    /// Concatenate excerpts, each prefixed by its file name
    pub fn build_context(documents: &[RelevantDocument]) -> String {
        documents
            .iter()
            .map(|doc| format!("From {}:\n{}", doc.filename, doc.excerpt))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Pre-computed arithmetic block, empty when nothing was computed
    fn format_calculations(calculations: &[Calculation]) -> String {
        if calculations.is_empty() {
            return String::new();
        }

        let lines = calculations
            .iter()
            .map(|c| format!("- {} = {}", c.expression, c.value))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\nPre-computed calculations:\n{}\n", lines)
    }

    fn bullets(items: &[&str]) -> String {
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_context_prefixes_filenames() {
        let docs = vec![
            RelevantDocument {
                filename: "mechanics.txt".to_string(),
                path: PathBuf::from("books/mechanics.txt"),
                excerpt: "F = ma".to_string(),
                size: 6,
            },
            RelevantDocument {
                filename: "waves.md".to_string(),
                path: PathBuf::from("books/waves.md"),
                excerpt: "v = f lambda".to_string(),
                size: 12,
            },
        ];

        assert_eq!(
            PromptBuilder::build_context(&docs),
            "From mechanics.txt:\nF = ma\n\nFrom waves.md:\nv = f lambda"
        );
    }

    #[test]
    fn test_calculations_included_only_when_present() {
        let with = PromptBuilder::build_tutoring_prompt(
            "You are a tutor.",
            "What is 2 + 2?",
            &[Calculation {
                expression: "2+2".to_string(),
                value: 4.0,
            }],
            &["Show each step"],
        );
        assert!(with.contains("Pre-computed calculations:\n- 2+2 = 4"));

        let without = PromptBuilder::build_tutoring_prompt("You are a tutor.", "Why?", &[], &[]);
        assert!(!without.contains("Pre-computed"));
    }

    #[test]
    fn test_confidence_prompt_names_agent() {
        let prompt = PromptBuilder::build_confidence_prompt(
            "Physics Agent",
            "Handles physics questions",
            "What is inertia?",
        );
        assert!(prompt.contains(r#"the "Physics Agent" is"#));
        assert!(prompt.contains("Agent specialty: Handles physics questions"));
        assert!(prompt.ends_with("Respond with only a number from 1-10."));
    }
}
