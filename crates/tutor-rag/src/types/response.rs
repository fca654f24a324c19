//! Response types for tutor queries and corpus management

use serde::{Deserialize, Serialize};

/// Tool identifiers, in first-use order without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolsUsed(Vec<String>);

impl ToolsUsed {
    /// Empty tool list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tool; repeated records keep the first position
    pub fn record(&mut self, tool: impl Into<String>) {
        let tool = tool.into();
        if !self.0.contains(&tool) {
            self.0.push(tool);
        }
    }

    /// Merge another list, preserving order
    pub fn extend(&mut self, other: &ToolsUsed) {
        for tool in &other.0 {
            self.record(tool.clone());
        }
    }

    /// Whether a tool was used
    pub fn contains(&self, tool: &str) -> bool {
        self.0.iter().any(|t| t == tool)
    }

    /// Whether no tool was used
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tool identifiers as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ToolsUsed {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tools = Self::new();
        for tool in iter {
            tools.record(tool);
        }
        tools
    }
}

/// The answer returned for every question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    /// Answer text (or an embedded error description)
    pub answer: String,
    /// Name of the responder that produced the answer
    pub agent_used: String,
    /// Tools used while answering
    pub tools_used: ToolsUsed,
    /// File names of the documents the answer was grounded in
    pub sources: Vec<String>,
}

impl AnswerEnvelope {
    /// Create a new envelope
    pub fn new(
        answer: impl Into<String>,
        agent_used: impl Into<String>,
        tools_used: ToolsUsed,
        sources: Vec<String>,
    ) -> Self {
        Self {
            answer: answer.into(),
            agent_used: agent_used.into(),
            tools_used,
            sources,
        }
    }
}

/// Identity and expertise of a responder. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Display name, reported as `agent_used`
    pub name: String,
    /// Free-text description of the domain expertise
    pub description: String,
    /// Tool identifiers the responder owns
    pub tools: Vec<String>,
}

impl AgentDescriptor {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, description: impl Into<String>, tools: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Whether the responder owns a tool
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }
}

/// Response for listing agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListResponse {
    /// Router first, then the specialists in poll order
    pub agents: Vec<AgentDescriptor>,
}

/// A supported file found in the books directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookFile {
    /// File name
    pub name: String,
    /// Path relative to the books directory
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Lower-cased extension including the dot
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Response for the corpus check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckBooksResponse {
    /// Whether the books directory exists
    pub exists: bool,
    /// Human-readable summary
    pub message: String,
    /// Supported files found
    pub files: Vec<BookFile>,
}

/// Response for corpus uploads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the upload as a whole succeeded
    pub success: bool,
    /// Names the files were saved under
    pub uploaded_files: Vec<String>,
    /// Rejected files with the reason in parentheses
    pub skipped_files: Vec<String>,
    /// Summary message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Successful upload summary
    pub fn completed(uploaded_files: Vec<String>, skipped_files: Vec<String>) -> Self {
        let message = format!("Successfully uploaded {} files", uploaded_files.len());
        Self {
            success: true,
            uploaded_files,
            skipped_files,
            message: Some(message),
            error: None,
        }
    }

    /// Failed upload
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_used_dedup_keeps_order() {
        let mut tools = ToolsUsed::new();
        tools.record("calculator");
        tools.record("syllabus_search");
        tools.record("calculator");

        assert_eq!(tools.as_slice(), &["calculator", "syllabus_search"]);
        assert_eq!(serde_json::to_string(&tools).unwrap(), r#"["calculator","syllabus_search"]"#);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = AnswerEnvelope::new(
            "4",
            "Math Agent",
            ["calculator"].into_iter().collect(),
            vec![],
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["agent_used"], "Math Agent");
        assert_eq!(json["tools_used"][0], "calculator");
        assert!(json["sources"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_upload_failure_shape() {
        let json = serde_json::to_value(UploadResponse::failed("disk full")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "disk full");
        assert!(json.get("message").is_none());
        assert!(json["uploaded_files"].as_array().unwrap().is_empty());
    }
}
