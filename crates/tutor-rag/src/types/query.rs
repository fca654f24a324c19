//! Question request types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an answer must be grounded in the syllabus corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Answer only from the local document corpus
    OnSyllabus,
    /// Answer from general knowledge
    #[default]
    OffSyllabus,
}

impl Mode {
    /// Whether this mode requires grounding
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::OnSyllabus)
    }

    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnSyllabus => "on-syllabus",
            Self::OffSyllabus => "off-syllabus",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question submitted to the tutor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,

    /// Grounding mode (default: off-syllabus)
    #[serde(default)]
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_off_syllabus() {
        let request: AskRequest = serde_json::from_str(r#"{"question": "What is 2 + 2?"}"#).unwrap();
        assert_eq!(request.mode, Mode::OffSyllabus);
        assert!(!request.mode.is_grounded());
    }

    #[test]
    fn test_mode_wire_names() {
        let request: AskRequest =
            serde_json::from_str(r#"{"question": "q", "mode": "on-syllabus"}"#).unwrap();
        assert_eq!(request.mode, Mode::OnSyllabus);
        assert_eq!(serde_json::to_string(&Mode::OffSyllabus).unwrap(), "\"off-syllabus\"");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = serde_json::from_str::<AskRequest>(r#"{"question": "q", "mode": "syllabus"}"#);
        assert!(result.is_err());
    }
}
