//! Document identifiers and upload payloads

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest extension carried over from the uploaded file name
const MAX_EXTENSION_LEN: usize = 16;

/// Identifier of a stored document, e.g. `1718031234567.pdf`
///
/// The stem (identifier without its extension) keys the extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Build an identifier from a generated token and the original file name's extension
    pub fn generate(token: &str, original_name: Option<&str>) -> Self {
        match original_name.and_then(extension_of) {
            Some(ext) => Self(format!("{}.{}", token, ext)),
            None => Self(token.to_string()),
        }
    }

    /// Wrap an identifier supplied by a client
    pub fn from_client(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without its extension
    ///
    /// Only the final path component is considered, so `../x.pdf` yields `x`.
    /// Returns `None` for stems that cannot name a stored text (`""`, `.`, `..`).
    pub fn stem(&self) -> Option<&str> {
        let base = base_name(&self.0);
        let stem = match base.rfind('.') {
            Some(0) | None => base,
            Some(i) => &base[..i],
        };
        match stem {
            "" | "." | ".." => None,
            s => Some(s),
        }
    }

    /// The extension, if any (without the dot)
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Extension of the final path component; only short alphanumeric extensions qualify
fn extension_of(name: &str) -> Option<&str> {
    let base = base_name(name);
    let dot = base.rfind('.').filter(|&i| i > 0)?;
    let ext = &base[dot + 1..];
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

/// A file received for ingestion
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name the client gave the file
    pub filename: Option<String>,
    /// Declared media type
    pub media_type: Option<String>,
    /// Raw bytes
    pub data: Bytes,
}

impl UploadedFile {
    /// Create an upload with a name, declared media type and content
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: Some(filename.into()),
            media_type: Some(media_type.into()),
            data: data.into(),
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the upload carries no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of a completed ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Identifier of the stored document
    pub id: DocumentId,
    /// Raw document size in bytes
    pub size_bytes: usize,
    /// Characters in the stored text
    pub text_chars: usize,
    /// SHA-256 of the raw document (hex)
    pub content_hash: String,
}
