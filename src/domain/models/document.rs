//! Source documents handed to the ingestion pipeline.

use serde::{Deserialize, Serialize};

/// File extension that marks ingestible documents.
pub const DOCUMENT_EXTENSION: &str = "txt";

/// A named source of raw text, immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier used to derive chunk ids
    pub id: String,

    /// Source label stored in chunk metadata
    pub source: String,

    /// Raw UTF-8 content
    pub text: String,
}

impl Document {
    /// Create a document whose source label equals its id
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source: id.clone(),
            id,
            text: text.into(),
        }
    }

    /// Create a document from a file name such as `react_hooks.txt`.
    ///
    /// The id drops the `.txt` extension; the source keeps the full name.
    pub fn from_file_name(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let source = file_name.into();
        let suffix = format!(".{DOCUMENT_EXTENSION}");
        let id = source
            .strip_suffix(suffix.as_str())
            .unwrap_or(&source)
            .to_string();

        Self {
            id,
            source,
            text: text.into(),
        }
    }
}
