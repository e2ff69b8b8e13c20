use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreResult};
use crate::document::{Collection, DocumentId, DocumentRow};

/// Volatile store backed by a vector in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<DocumentRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_first(&self, collection: Collection) -> StoreResult<Option<DocumentRow>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.collection == collection).cloned())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> StoreResult<Option<DocumentRow>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.collection == collection && r.id == id)
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<DocumentRow>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| {
                r.collection == collection
                    && r.content.get(field).and_then(Value::as_str) == Some(value)
            })
            .cloned())
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<DocumentRow>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.collection == collection)
            .cloned()
            .collect())
    }

    async fn insert(&self, collection: Collection, content: Value) -> StoreResult<DocumentRow> {
        let now = Utc::now();
        let row = DocumentRow {
            id: DocumentId::new(),
            collection,
            content,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        content: Value,
    ) -> StoreResult<Option<DocumentRow>> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.collection == collection && r.id == id)
        else {
            return Ok(None);
        };
        row.content = content;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.collection == collection && r.id == id));
        Ok(rows.len() < before)
    }

    async fn delete_all(&self, collection: Collection) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.collection != collection);
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| r.collection == collection).count() as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
