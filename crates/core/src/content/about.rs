use serde::{Deserialize, Serialize};

use crate::document::validate::require_text;
use crate::document::{Collection, Resource, ValidationError};

/// The "About" section. Singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

/// About as submitted by the editor form, which never sends `stats`.
/// Absent stats keep whatever is stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInput {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub stats: Option<Vec<Stat>>,
}

impl AboutInput {
    pub fn into_about(self, current: Option<&About>) -> About {
        let stats = match (self.stats, current) {
            (Some(stats), _) => stats,
            (None, Some(current)) => current.stats.clone(),
            (None, None) => Vec::new(),
        };
        About {
            title: self.title,
            subtitle: self.subtitle,
            paragraphs: self.paragraphs,
            quote: self.quote,
            image: self.image,
            public_id: self.public_id,
            stats,
        }
    }
}

/// A highlighted figure, e.g. `{ icon: "Music", label: "Songs", value: "40+" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Resource for About {
    const COLLECTION: Collection = Collection::About;

    const PATCHABLE_IMAGE: Option<&'static str> = Some("image");

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }

    fn asset_url(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn asset_id(&self) -> Option<String> {
        self.public_id.clone()
    }
}
