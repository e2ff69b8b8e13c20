use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::document::validate::require_text;
use crate::document::{Collection, Resource, Stored, ValidationError};

/// A YouTube video shown in the carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub youtube_id: String,
    pub thumbnail: String,
    /// Carousel position; lower comes first.
    #[serde(default)]
    pub order: i64,
}

impl Resource for Video {
    const COLLECTION: Collection = Collection::Videos;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("youtubeId", &self.youtube_id)?;
        require_text("thumbnail", &self.thumbnail)
    }

    fn ordering(a: &Stored<Self>, b: &Stored<Self>) -> Ordering {
        a.content
            .order
            .cmp(&b.content.order)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    }
}
