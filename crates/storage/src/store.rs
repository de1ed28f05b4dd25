use crate::error::Result;
use crate::models::{Document, DocumentPath, DocumentWrite};

/// Bulk document operations the sync pipeline relies on.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upserts every document, replacing stored data entirely and refreshing
    /// its update time.
    async fn bulk_set(&self, writes: Vec<DocumentWrite>) -> Result<()>;

    /// Deletes every listed document. Missing documents are ignored.
    async fn bulk_delete(&self, paths: Vec<DocumentPath>) -> Result<()>;

    /// Reads every document living in a collection named `collection_id`,
    /// whatever its parent document.
    async fn collection_group(&self, collection_id: &str) -> Result<Vec<Document>>;

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;
}
