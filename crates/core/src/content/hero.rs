use serde::{Deserialize, Serialize};

use crate::document::validate::require_text;
use crate::document::{Collection, Resource, ValidationError};

/// The landing hero. Singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub name: String,
    #[serde(default)]
    pub tagline: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// Hero as submitted by the admin form, where `tagline` may arrive either
/// as a list or as a JSON-encoded list inside a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: Option<TaglineField>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaglineField {
    List(Vec<String>),
    Encoded(String),
}

impl TaglineField {
    fn into_list(self) -> Result<Vec<String>, ValidationError> {
        match self {
            TaglineField::List(items) => Ok(items),
            TaglineField::Encoded(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            TaglineField::Encoded(raw) => {
                serde_json::from_str(&raw).map_err(|e| ValidationError::Invalid {
                    field: "tagline",
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl TryFrom<HeroInput> for Hero {
    type Error = ValidationError;

    fn try_from(input: HeroInput) -> Result<Self, Self::Error> {
        let tagline = match input.tagline {
            Some(field) => field.into_list()?,
            None => Vec::new(),
        };
        let hero = Hero {
            name: input.name,
            tagline,
            description: input.description,
            image: input.image,
            public_id: input.public_id,
        };
        hero.validate()?;
        Ok(hero)
    }
}

impl Resource for Hero {
    const COLLECTION: Collection = Collection::Hero;

    const PATCHABLE_IMAGE: Option<&'static str> = Some("image");

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        if self.tagline.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::Invalid {
                field: "tagline",
                reason: "entries must not be blank".into(),
            });
        }
        Ok(())
    }

    fn asset_url(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn asset_id(&self) -> Option<String> {
        self.public_id.clone()
    }
}
