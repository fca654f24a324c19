//! Prompt construction and defensive parsing of classifier replies

pub mod parse;
pub mod prompt;

pub use parse::{parse_score, parse_yes_no};
pub use prompt::PromptBuilder;
