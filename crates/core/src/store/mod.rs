//! Document persistence.
//!
//! Each content type lives in its own collection of JSON documents. The
//! store knows nothing about content shapes; typing happens in
//! [`crate::mutation`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::document::{Collection, DocumentId, DocumentRow};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt document: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The oldest document in the collection, if any.
    async fn find_first(&self, collection: Collection) -> StoreResult<Option<DocumentRow>>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> StoreResult<Option<DocumentRow>>;

    /// First document whose top-level string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<DocumentRow>>;

    /// Every document in the collection, in insertion order.
    async fn list(&self, collection: Collection) -> StoreResult<Vec<DocumentRow>>;

    async fn insert(&self, collection: Collection, content: Value) -> StoreResult<DocumentRow>;

    /// Overwrite a document's content. Returns `None` when it no longer exists.
    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        content: Value,
    ) -> StoreResult<Option<DocumentRow>>;

    /// Returns whether a document was removed.
    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> StoreResult<bool>;

    /// Returns how many documents were removed.
    async fn delete_all(&self, collection: Collection) -> StoreResult<u64>;

    async fn count(&self, collection: Collection) -> StoreResult<u64>;

    /// Cheap connectivity check for health probes.
    async fn ping(&self) -> StoreResult<()>;
}
