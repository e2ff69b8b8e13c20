use serde::{Deserialize, Serialize};

use crate::document::validate::require_text;
use crate::document::{Collection, Resource, ValidationError};
use crate::media::public_id_from_url;

/// A lyrics sheet or blog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    /// Display date as entered by the editor (usually ISO 8601).
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Lyrics,
    #[default]
    Blog,
}

impl Resource for Post {
    const COLLECTION: Collection = Collection::Posts;

    const PATCHABLE_IMAGE: Option<&'static str> = Some("image");

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("date", &self.date)
    }

    fn asset_url(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Older posts stored only the image URL, so fall back to deriving the
    /// reference from it.
    fn asset_id(&self) -> Option<String> {
        self.public_id
            .clone()
            .or_else(|| self.image.as_deref().and_then(public_id_from_url))
    }
}
