//! Books directory inspection and upload

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::retrieval::store::is_supported;
use crate::server::state::AppState;
use crate::types::response::{CheckBooksResponse, UploadResponse};

/// Multipart field carrying uploaded files
const FILES_FIELD: &str = "files";

/// GET /api/check-books - Report the books directory and its supported files
pub async fn check_books(State(state): State<AppState>) -> Json<CheckBooksResponse> {
    let store = state.store();

    if !store.exists() {
        return Json(CheckBooksResponse {
            exists: false,
            message: "Books directory not found. Please create a 'books' directory and add your syllabus materials.".to_string(),
            files: Vec::new(),
        });
    }

    let walker = store.clone();
    let files = match tokio::task::spawn_blocking(move || walker.list_files()).await {
        Ok(files) => files,
        Err(e) => {
            tracing::error!("Listing books failed: {}", e);
            Vec::new()
        }
    };
    Json(CheckBooksResponse {
        exists: true,
        message: format!("Found {} supported files in books directory.", files.len()),
        files,
    })
}

/// POST /api/upload-books - Save uploaded files into the books directory
pub async fn upload_books(State(state): State<AppState>, multipart: Multipart) -> Json<UploadResponse> {
    match save_uploads(state.store().root(), multipart).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Upload failed: {}", e);
            Json(UploadResponse::failed(e.to_string()))
        }
    }
}

async fn save_uploads(books_dir: &Path, mut multipart: Multipart) -> Result<UploadResponse> {
    tokio::fs::create_dir_all(books_dir).await?;

    let mut uploaded_files = Vec::new();
    let mut skipped_files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Upload(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let client_name = field.file_name().unwrap_or_default().to_string();
        let Some(filename) = base_name(&client_name) else {
            skipped_files.push(format!("{} (invalid file name)", client_name));
            continue;
        };

        if !is_supported(Path::new(&filename)) {
            skipped_files.push(format!("{} (unsupported format)", client_name));
            continue;
        }

        let target = unique_target(books_dir, &filename, chrono::Utc::now().timestamp());

        let saved = match field.bytes().await {
            Ok(data) => tokio::fs::write(&target, &data)
                .await
                .map(|_| data.len())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match saved {
            Ok(size) => {
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or(filename);
                tracing::info!("Saved {} ({} bytes)", name, size);
                uploaded_files.push(name);
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", client_name, e);
                skipped_files.push(format!("{} (error: {})", client_name, e));
            }
        }
    }

    Ok(UploadResponse::completed(uploaded_files, skipped_files))
}

/// Final path component of a client-supplied file name
fn base_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Target path for `filename`, as `<stem>_<timestamp><ext>` when the name is taken
fn unique_target(books_dir: &Path, filename: &str, timestamp: i64) -> PathBuf {
    let target = books_dir.join(filename);
    if !target.exists() {
        return target;
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    books_dir.join(format!("{}_{}{}", stem, timestamp, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name("notes.txt").as_deref(), Some("notes.txt"));
        assert_eq!(base_name("../../etc/passwd.txt").as_deref(), Some("passwd.txt"));
        assert_eq!(base_name(r"C:\Users\me\ch1.pdf").as_deref(), Some("ch1.pdf"));
        assert_eq!(base_name("dir/"), None);
        assert_eq!(base_name(".."), None);
    }

    #[test]
    fn test_unique_target_renames_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_target(dir.path(), "ch1.pdf", 1_700_000_000),
            dir.path().join("ch1.pdf")
        );

        std::fs::write(dir.path().join("ch1.pdf"), b"%PDF").unwrap();
        assert_eq!(
            unique_target(dir.path(), "ch1.pdf", 1_700_000_000),
            dir.path().join("ch1_1700000000.pdf")
        );
    }
}
