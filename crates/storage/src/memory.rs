use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::models::{Document, DocumentPath, DocumentWrite};
use crate::store::DocumentStore;

/// In-process document store used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<DocumentPath, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document with an explicit update time, bypassing the clock.
    pub fn insert_at(
        &self,
        path: DocumentPath,
        data: serde_json::Value,
        update_time: DateTime<Utc>,
    ) {
        self.lock().insert(
            path.clone(),
            Document {
                path,
                data,
                update_time,
            },
        );
    }

    pub fn paths(&self) -> Vec<DocumentPath> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<DocumentPath, Document>> {
        // a poisoned map is still consistent: every mutation is a single insert or remove
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn bulk_set(&self, writes: Vec<DocumentWrite>) -> Result<()> {
        let now = Utc::now();
        let mut documents = self.lock();
        for write in writes {
            documents.insert(
                write.path.clone(),
                Document {
                    path: write.path,
                    data: write.data,
                    update_time: now,
                },
            );
        }
        Ok(())
    }

    async fn bulk_delete(&self, paths: Vec<DocumentPath>) -> Result<()> {
        let mut documents = self.lock();
        for path in &paths {
            documents.remove(path);
        }
        Ok(())
    }

    async fn collection_group(&self, collection_id: &str) -> Result<Vec<Document>> {
        Ok(self
            .lock()
            .values()
            .filter(|document| document.path.collection_id() == collection_id)
            .cloned()
            .collect())
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        Ok(self.lock().get(path).cloned())
    }
}
