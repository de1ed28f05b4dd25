use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::Result;
use crate::models::{Document, DocumentPath, DocumentWrite};
use crate::repository::DocumentRepository;
use crate::store::DocumentStore;

/// Postgres-backed document store
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for Database {
    async fn bulk_set(&self, writes: Vec<DocumentWrite>) -> Result<()> {
        let affected = DocumentRepository::new(&self.pool)
            .upsert_all(&writes)
            .await?;
        tracing::debug!("Upserted {} document(s)", affected);
        Ok(())
    }

    async fn bulk_delete(&self, paths: Vec<DocumentPath>) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let affected = DocumentRepository::new(&self.pool)
            .delete_all(&paths)
            .await?;
        tracing::debug!("Deleted {} document(s)", affected);
        Ok(())
    }

    async fn collection_group(&self, collection_id: &str) -> Result<Vec<Document>> {
        DocumentRepository::new(&self.pool)
            .list_collection_group(collection_id)
            .await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        DocumentRepository::new(&self.pool).find_by_path(path).await
    }
}
