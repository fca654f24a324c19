//! Directory-backed document store
//!
//! The directory tree is the only state: every call walks it again and
//! re-extracts each file. There is no index and no modification-time cache.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::ingestion::FileParser;
use crate::types::document::SUPPORTED_EXTENSIONS;
use crate::types::response::BookFile;
use crate::types::{Document, FileType};

/// Enumerates and extracts the corpus under a root directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    max_pdf_pages: u32,
}

impl DocumentStore {
    /// Create a store over `root`
    pub fn new(root: impl Into<PathBuf>, max_pdf_pages: u32) -> Self {
        Self {
            root: root.into(),
            max_pdf_pages,
        }
    }

    /// Root directory of the corpus
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root directory exists
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Supported files under the root, in walk order
    pub fn document_paths(&self) -> Vec<PathBuf> {
        if !self.exists() {
            tracing::warn!("Books directory not found: {}", self.root.display());
        }

        self.supported_entries().map(DirEntry::into_path).collect()
    }

    /// Walk and extract the corpus on the blocking pool, one file per task.
    /// Failed or whitespace-only files are logged and skipped.
    pub async fn documents(&self) -> Result<Vec<Document>> {
        let store = self.clone();
        let paths = tokio::task::spawn_blocking(move || store.document_paths())
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?;

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let store = self.clone();
            let loaded = tokio::task::spawn_blocking(move || store.load(&path))
                .await
                .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?;
            documents.extend(loaded);
        }
        Ok(documents)
    }

    /// List supported files without extracting them
    pub fn list_files(&self) -> Vec<BookFile> {
        self.supported_entries()
            .map(|entry| {
                let path = entry.path();
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                let extension = path
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                    .unwrap_or_default();

                BookFile {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path: relative.to_string_lossy().to_string(),
                    size: entry.metadata().map(|m| m.len()).unwrap_or(0),
                    file_type: extension,
                }
            })
            .collect()
    }

    /// Extract one file, logging and swallowing failures
    pub fn load(&self, path: &Path) -> Option<Document> {
        let file_type = FileType::from_path(path);
        let name = path.display().to_string();
        tracing::debug!("Processing file: {}", name);

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Error reading {}: {}", name, e);
                return None;
            }
        };

        let content = match FileParser::extract(&name, file_type, &data, self.max_pdf_pages) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error extracting {}: {}", name, e);
                return None;
            }
        };

        if content.trim().is_empty() {
            tracing::info!("No content extracted from {}", name);
            return None;
        }

        let doc = Document::new(path.to_path_buf(), file_type, content);
        tracing::debug!("Extracted {} characters from {}", doc.size, name);
        Some(doc)
    }

    /// Files under the root with a supported extension, in file-name order
    fn supported_entries(&self) -> impl Iterator<Item = DirEntry> {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    // The missing-root case is reported once by `documents`
                    if e.depth() > 0 {
                        tracing::warn!("Skipping unreadable entry: {}", e);
                    }
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
    }
}

/// Whether a path carries one of the corpus extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
