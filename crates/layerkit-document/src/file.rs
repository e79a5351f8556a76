//! Document files: the unit written to disk and sent to the persistence API.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult, MalformedDocumentError, MalformedReason};
use crate::minify::{minify_document, unminify_document, MinifiedDocument};
use crate::serialization::{deserialize, serialize, SerializedDocument};

/// Document file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete document file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub version: String,
    pub metadata: DocumentMetadata,
    /// Free-form editor state owned by the presentation layer.
    #[serde(default)]
    pub editor_config: Value,
    /// Plain serialized pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SerializedDocument>,
    /// Minified pages, used instead of `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packed: Option<MinifiedDocument>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DocumentFile {
    /// Wraps a document, optionally minifying its pages.
    pub fn new(
        name: impl Into<String>,
        document: &Document,
        editor_config: Value,
        minify: bool,
    ) -> DocumentResult<Self> {
        let now = Utc::now();
        let mut file = Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            editor_config,
            data: None,
            packed: None,
        };
        file.set_document(document, minify)?;
        Ok(file)
    }

    /// Replaces the stored pages and bumps the modification time.
    pub fn set_document(&mut self, document: &Document, minify: bool) -> DocumentResult<()> {
        let serialized = serialize(document);
        if minify {
            self.packed = Some(minify_document(&serialized)?);
            self.data = None;
        } else {
            self.data = Some(serialized);
            self.packed = None;
        }
        self.metadata.modified = Utc::now();
        Ok(())
    }

    pub fn is_minified(&self) -> bool {
        self.packed.is_some()
    }

    /// Serialized pages, unminified if necessary.
    pub fn serialized(&self) -> DocumentResult<SerializedDocument> {
        match (&self.data, &self.packed) {
            (Some(_), Some(_)) => Err(malformed(
                "file carries both plain and minified pages".to_string(),
            )),
            (Some(data), None) => Ok(data.clone()),
            (None, Some(packed)) => unminify_document(packed),
            (None, None) => Err(MalformedDocumentError::document(MalformedReason::NoPages).into()),
        }
    }

    /// Validated document held by this file.
    pub fn document(&self) -> DocumentResult<Document> {
        deserialize(&self.serialized()?)
    }

    pub fn to_bytes(&self, pretty: bool) -> DocumentResult<Vec<u8>> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        };
        bytes.map_err(|e| DocumentError::SaveFailed(e.to_string()))
    }

    /// Parses a file, rejecting versions other than 1.x.
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        let file: Self = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        if file.version.split('.').next() != FILE_FORMAT_VERSION.split('.').next() {
            return Err(MalformedDocumentError::document(MalformedReason::UnsupportedVersion(
                file.version,
            ))
            .into());
        }
        Ok(file)
    }

    /// Save document to file
    pub fn save_to_file(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let bytes = self.to_bytes(pretty).context("Failed to serialize document")?;
        std::fs::write(path.as_ref(), bytes).context("Failed to write document file")?;
        tracing::info!("Saved document '{}' to {}", self.metadata.name, path.as_ref().display());
        Ok(())
    }

    /// Load document from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref()).context("Failed to read document file")?;
        let file = Self::from_bytes(&bytes).context("Failed to parse document file")?;
        tracing::info!(
            "Loaded document '{}' from {}",
            file.metadata.name,
            path.as_ref().display()
        );
        Ok(file)
    }
}

fn malformed(reason: String) -> DocumentError {
    MalformedDocumentError::document(MalformedReason::Json(reason)).into()
}
