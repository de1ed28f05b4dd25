use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StorageError};

/// Slash-separated path to a document, alternating collection and document
/// ids: `competitions/<id>` or `competitions/<id>/games/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn parse(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let segments: Vec<&str> = path.split('/').collect();

        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(StorageError::invalid_path(&path, "empty segment"));
        }
        if segments.len() % 2 != 0 {
            return Err(StorageError::invalid_path(
                &path,
                "a document path needs an even number of segments",
            ));
        }

        Ok(Self(path))
    }

    /// Top-level document `<collection>/<id>`.
    pub fn root(collection: &str, id: &str) -> Result<Self> {
        Self::parse(format!("{}/{}", collection, id))
    }

    /// Document `<id>` in the sub-collection `<collection>` of this document.
    pub fn child(&self, collection: &str, id: &str) -> Result<Self> {
        Self::parse(format!("{}/{}/{}", self.0, collection, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn document_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Id of the collection holding this document.
    pub fn collection_id(&self) -> &str {
        self.0.rsplit('/').nth(1).unwrap_or_default()
    }

    /// Document owning the collection this document lives in, if any.
    pub fn parent_document(&self) -> Option<DocumentPath> {
        let segments: Vec<&str> = self.0.split('/').collect();
        if segments.len() < 4 {
            return None;
        }
        Some(Self(segments[..segments.len() - 2].join("/")))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

/// A stored document as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: DocumentPath,
    pub data: serde_json::Value,
    pub update_time: DateTime<Utc>,
}

/// Full-overwrite write of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub path: DocumentPath,
    pub data: serde_json::Value,
}

impl DocumentWrite {
    pub fn new<T: Serialize>(path: DocumentPath, data: &T) -> Result<Self> {
        Ok(Self {
            path,
            data: serde_json::to_value(data)?,
        })
    }
}
