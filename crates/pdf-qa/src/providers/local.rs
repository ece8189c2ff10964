//! Local filesystem document store
//!
//! Raw documents live in one directory as `<identifier>`, extracted text in a
//! second directory as `<stem>.txt`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocumentId;

use super::document_store::{ClearStats, DocumentStoreProvider};

/// Local document store using filesystem
pub struct LocalDocumentStore {
    /// Directory for raw documents
    upload_dir: PathBuf,
    /// Directory for extracted text
    text_dir: PathBuf,
}

impl LocalDocumentStore {
    /// Create a new local document store, creating both directories if absent
    pub fn new(upload_dir: impl Into<PathBuf>, text_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let text_dir = text_dir.into();
        std::fs::create_dir_all(&upload_dir)?;
        std::fs::create_dir_all(&text_dir)?;
        Ok(Self {
            upload_dir,
            text_dir,
        })
    }

    /// Directory holding raw documents
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Directory holding extracted text
    pub fn text_dir(&self) -> &Path {
        &self.text_dir
    }

    /// Get path for a raw document
    fn doc_path(&self, id: &DocumentId) -> Result<PathBuf> {
        Ok(self.upload_dir.join(checked_key(id.as_str())?))
    }

    /// Get path for extracted text
    fn text_path(&self, stem: &str) -> Result<PathBuf> {
        Ok(self.text_dir.join(format!("{}.txt", checked_key(stem)?)))
    }
}

/// Keys must name a single entry inside the storage directory
fn checked_key(key: &str) -> Result<&str> {
    if key.is_empty() || key == "." || key == ".." || key.contains(&['/', '\\', '\0'][..]) {
        return Err(Error::storage(format!("Invalid storage key: {:?}", key)));
    }
    Ok(key)
}

/// Remove every file directly inside `dir`, returning how many were removed
async fn purge_dir(dir: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        Error::storage(format!("Cannot read {}: {}", dir.display(), e))
    })?;

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tracing::debug!("Leaving directory {} in place", path.display());
            continue;
        }
        tokio::fs::remove_file(&path).await.map_err(|e| {
            Error::storage(format!("Cannot remove {}: {}", path.display(), e))
        })?;
        removed += 1;
    }

    Ok(removed)
}

#[async_trait]
impl DocumentStoreProvider for LocalDocumentStore {
    async fn put_document(&self, id: &DocumentId, data: &[u8]) -> Result<String> {
        let doc_path = self.doc_path(id)?;
        tokio::fs::write(&doc_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), doc_path.display());
        Ok(doc_path.to_string_lossy().to_string())
    }

    async fn put_text(&self, stem: &str, text: &str) -> Result<String> {
        let text_path = self.text_path(stem)?;
        tokio::fs::write(&text_path, text.as_bytes()).await?;
        tracing::debug!("Wrote {} bytes of text to {}", text.len(), text_path.display());
        Ok(text_path.to_string_lossy().to_string())
    }

    async fn get_text(&self, stem: &str) -> Result<Option<String>> {
        let text_path = match self.text_path(stem) {
            Ok(p) => p,
            // A key that cannot exist on disk is simply not stored
            Err(_) => return Ok(None),
        };

        match tokio::fs::read_to_string(&text_path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}: {}",
                text_path.display(),
                e
            ))),
        }
    }

    async fn clear_all(&self) -> Result<ClearStats> {
        let documents = purge_dir(&self.upload_dir).await?;
        let texts = purge_dir(&self.text_dir).await?;
        Ok(ClearStats { documents, texts })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.upload_dir.is_dir() && self.text_dir.is_dir())
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}
