use serde::{Deserialize, Serialize};

use super::AssetOwner;
use crate::document::validate::{max_chars, require_text};
use crate::document::{Collection, Resource, ValidationError};
use crate::media::UploadedAsset;

pub const MAX_DESCRIPTION_CHARS: usize = 25_000;

/// An entry in the "my activity" feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub public_id: String,
}

impl Activity {
    pub fn new(title: String, description: String, asset: UploadedAsset) -> Self {
        Self {
            title,
            description,
            image_url: asset.url,
            public_id: asset.public_id,
        }
    }

    /// Check the editor-supplied text before anything is uploaded.
    pub fn check_text(title: &str, description: &str) -> Result<(), ValidationError> {
        require_text("title", title)?;
        require_text("description", description)?;
        max_chars("description", description, MAX_DESCRIPTION_CHARS)
    }
}

impl Resource for Activity {
    const COLLECTION: Collection = Collection::Activity;

    fn validate(&self) -> Result<(), ValidationError> {
        Self::check_text(&self.title, &self.description)?;
        require_text("imageUrl", &self.image_url)?;
        require_text("publicId", &self.public_id)
    }

    fn asset_url(&self) -> Option<&str> {
        Some(&self.image_url)
    }

    fn asset_id(&self) -> Option<String> {
        Some(self.public_id.clone())
    }
}

impl AssetOwner for Activity {
    fn attach(&mut self, asset: UploadedAsset) {
        self.image_url = asset.url;
        self.public_id = asset.public_id;
    }
}
