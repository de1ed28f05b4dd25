use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::error::Result;
use crate::models::{Document, DocumentPath, DocumentWrite};

#[derive(Debug, FromRow)]
struct DocumentRow {
    path: String,
    data: serde_json::Value,
    update_time: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = crate::error::StorageError;

    fn try_from(row: DocumentRow) -> Result<Self> {
        Ok(Document {
            path: DocumentPath::parse(row.path)?,
            data: row.data,
            update_time: row.update_time,
        })
    }
}

/// Repository for the `documents` table
pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert all documents in one transaction, overwriting stored data
    pub async fn upsert_all(&self, writes: &[DocumentWrite]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for write in writes {
            let parent = write
                .path
                .parent_document()
                .map(|parent| parent.as_str().to_string());

            let result = sqlx::query(
                r#"
                INSERT INTO documents (path, parent_path, collection_id, data, update_time)
                VALUES ($1, $2, $3, $4, now())
                ON CONFLICT (path)
                DO UPDATE SET
                    data = EXCLUDED.data,
                    update_time = EXCLUDED.update_time
                "#,
            )
            .bind(write.path.as_str())
            .bind(parent)
            .bind(write.path.collection_id())
            .bind(&write.data)
            .execute(&mut *tx)
            .await?;

            affected += result.rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }

    pub async fn delete_all(&self, paths: &[DocumentPath]) -> Result<u64> {
        let paths: Vec<String> = paths.iter().map(|path| path.as_str().to_string()).collect();

        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE path = ANY($1)
            "#,
        )
        .bind(&paths)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List every document of a collection group
    pub async fn list_collection_group(&self, collection_id: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT path, data, update_time
            FROM documents
            WHERE collection_id = $1
            ORDER BY path
            "#,
        )
        .bind(collection_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    pub async fn find_by_path(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT path, data, update_time
            FROM documents
            WHERE path = $1
            "#,
        )
        .bind(path.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }
}
