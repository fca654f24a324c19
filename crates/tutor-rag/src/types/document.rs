//! Corpus document types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions (with leading dot) the corpus accepts
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".txt", ".md", ".pdf", ".docx", ".doc"];

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Old Microsoft Word document (.doc)
    Doc,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension (without the dot, any case)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => Self::Txt,
            "md" => Self::Markdown,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path or file name
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A corpus file with its extracted text. Rebuilt on every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// File name (final path component)
    pub filename: String,
    /// Full path on disk
    pub path: PathBuf,
    /// File type
    pub file_type: FileType,
    /// Extracted plain text
    pub content: String,
    /// Extracted size in characters
    pub size: usize,
}

impl Document {
    /// Create a document from extracted text
    pub fn new(path: PathBuf, file_type: FileType, content: String) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let size = content.chars().count();

        Self {
            filename,
            path,
            file_type,
            content,
            size,
        }
    }

    /// First `max_chars` characters of the content
    pub fn head(&self, max_chars: usize) -> &str {
        truncate_chars(&self.content, max_chars)
    }
}

/// A document judged relevant, carrying a bounded excerpt for grounding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevantDocument {
    /// File name cited as a source
    pub filename: String,
    /// Full path on disk
    pub path: PathBuf,
    /// Truncated content used as grounding context
    pub excerpt: String,
    /// Size of the full extracted text in characters
    pub size: usize,
}

impl RelevantDocument {
    /// Build from a document, truncating its text to `excerpt_chars`
    pub fn from_document(doc: &Document, excerpt_chars: usize) -> Self {
        Self {
            filename: doc.filename.clone(),
            path: doc.path.clone(),
            excerpt: doc.head(excerpt_chars).to_string(),
            size: doc.size,
        }
    }
}

/// Borrow at most `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
