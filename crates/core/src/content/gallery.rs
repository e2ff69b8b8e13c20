use serde::{Deserialize, Serialize};

use crate::document::validate::require_text;
use crate::document::{Collection, Resource, ValidationError};
use crate::media::UploadedAsset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub image_url: String,
    pub public_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GalleryImage {
    pub fn from_upload(asset: UploadedAsset) -> Self {
        Self {
            image_url: asset.url,
            public_id: asset.public_id,
            title: None,
            description: None,
        }
    }
}

impl Resource for GalleryImage {
    const COLLECTION: Collection = Collection::Gallery;

    fn validate(&self) -> Result<(), ValidationError> {
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

