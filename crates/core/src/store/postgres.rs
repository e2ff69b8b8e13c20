use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DocumentStore, StoreResult};
use crate::document::{Collection, DocumentId, DocumentRow};

const COLUMNS: &str = "id, content, created_at, updated_at";

/// Store backed by the `documents` table (see `migrations/`).
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PgRow {
    id: Uuid,
    content: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PgRow {
    fn into_row(self, collection: Collection) -> DocumentRow {
        DocumentRow {
            id: self.id.into(),
            collection,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_first(&self, collection: Collection) -> StoreResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, PgRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 ORDER BY seq ASC LIMIT 1"
        ))
        .bind(collection.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_row(collection)))
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> StoreResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, PgRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        ))
        .bind(collection.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_row(collection)))
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, PgRow>(&format!(
            "SELECT {COLUMNS} FROM documents \
             WHERE collection = $1 AND content ->> $2::text = $3 \
             ORDER BY seq ASC LIMIT 1"
        ))
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_row(collection)))
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<DocumentRow>> {
        let rows = sqlx::query_as::<_, PgRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 ORDER BY seq ASC"
        ))
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_row(collection)).collect())
    }

    async fn insert(&self, collection: Collection, content: Value) -> StoreResult<DocumentRow> {
        let row = sqlx::query_as::<_, PgRow>(&format!(
            "INSERT INTO documents (id, collection, content) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(DocumentId::new().as_uuid())
        .bind(collection.as_str())
        .bind(&content)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(%collection, id = %row.id, "inserted document");
        Ok(row.into_row(collection))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        content: Value,
    ) -> StoreResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, PgRow>(&format!(
            "UPDATE documents SET content = $3, updated_at = now() \
             WHERE collection = $1 AND id = $2 RETURNING {COLUMNS}"
        ))
        .bind(collection.as_str())
        .bind(id.as_uuid())
        .bind(&content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_row(collection)))
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, collection: Collection) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
