use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::id::DocumentId;
use super::validate::ValidationError;

/// Named document collections, one per content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    About,
    Hero,
    Posts,
    Videos,
    Gallery,
    Activity,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::About => "about",
            Collection::Hero => "hero",
            Collection::Posts => "posts",
            Collection::Videos => "videos",
            Collection::Gallery => "gallery",
            Collection::Activity => "activity",
        }
    }

    /// Human name for a single document, used in messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Collection::About => "about section",
            Collection::Hero => "hero section",
            Collection::Posts => "post",
            Collection::Videos => "video",
            Collection::Gallery => "image",
            Collection::Activity => "activity",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content type that lives in its own collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Wire name of an image URL that patches may change freely. A patch
    /// that changes it without a `publicId` drops the stored reference.
    const PATCHABLE_IMAGE: Option<&'static str> = None;

    /// Field-level checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Delivery URL of the image this document shows, if any.
    fn asset_url(&self) -> Option<&str> {
        None
    }

    /// Media-host reference of that image, used to delete it later.
    fn asset_id(&self) -> Option<String> {
        None
    }

    /// Listing order. Newest first unless a resource says otherwise.
    fn ordering(a: &Stored<Self>, b: &Stored<Self>) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// A typed document as returned to API clients.
///
/// The envelope fields use the names the portfolio frontend already reads
/// (`_id`, `createdAt`, `updatedAt`); content fields are flattened next to
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl<T: Resource> Stored<T> {
    /// Decode a raw row into its typed form.
    pub fn from_row(row: DocumentRow) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: row.id,
            content: serde_json::from_value(row.content)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Storage representation of a document.
/// Maps to the `documents` PostgreSQL table.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub id: DocumentId,
    pub collection: Collection,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl Resource for Note {
        const COLLECTION: Collection = Collection::Posts;
    }

    #[test]
    fn stored_flattens_content_beside_envelope() {
        let now = Utc::now();
        let row = DocumentRow {
            id: DocumentId::new(),
            collection: Collection::Posts,
            content: json!({ "text": "hello" }),
            created_at: now,
            updated_at: now,
        };
        let id = row.id;
        let stored = Stored::<Note>::from_row(row).unwrap();
        let value = serde_json::to_value(&stored).unwrap();

        assert_eq!(value["_id"], json!(id.to_string()));
        assert_eq!(value["text"], json!("hello"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("content").is_none());
    }

    #[test]
    fn default_ordering_is_newest_first() {
        let older = Utc::now() - chrono::Duration::seconds(10);
        let newer = Utc::now();
        let mk = |at| Stored {
            id: DocumentId::new(),
            content: Note { text: "x".into() },
            created_at: at,
            updated_at: at,
        };
        let mut items = vec![mk(older), mk(newer)];
        items.sort_by(Note::ordering);
        assert_eq!(items[0].created_at, newer);
    }
}
