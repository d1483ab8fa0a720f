//! Directory of plain-text documentation files.

use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Document, DOCUMENT_EXTENSION};

/// Directory of `.txt` documents, one document per file
#[derive(Debug, Clone)]
pub struct TextDirectorySource {
    dir: PathBuf,
}

impl TextDirectorySource {
    /// Create a source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read every `.txt` file, sorted by file name
    ///
    /// Sub-directories and other extensions are skipped. A missing directory
    /// yields no documents.
    ///
    /// # Errors
    /// `DocumentUnreadable` if the path is not a directory, or a file cannot
    /// be read or is not valid UTF-8
    pub async fn read_all(&self) -> DomainResult<Vec<Document>> {
        let paths = self.list_files().await?;
        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            documents.push(read_document(&path).await?);
        }

        tracing::debug!(
            dir = %self.dir.display(),
            documents = documents.len(),
            "documents read"
        );

        Ok(documents)
    }

    async fn list_files(&self) -> DomainResult<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %self.dir.display(), "document directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(unreadable(&self.dir, &e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unreadable(&self.dir, &e))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| unreadable(&path, &e))?
                .is_file();

            if is_file && path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION) {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

async fn read_document(path: &Path) -> DomainResult<Document> {
    let bytes = tokio::fs::read(path).await.map_err(|e| unreadable(path, &e))?;
    let text = String::from_utf8(bytes).map_err(|e| unreadable(path, &e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Document::from_file_name(file_name, text))
}

fn unreadable(path: &Path, err: &dyn std::fmt::Display) -> DomainError {
    DomainError::DocumentUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
