//! Typed read and write flows over the document store.
//!
//! Store writes and media-host cleanups are separate operations: there is
//! no transaction spanning both, and a cleanup failure never fails the
//! write it accompanies.

pub mod list;
pub mod singleton;
pub mod types;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::document::{Collection, DocumentRow, Resource, Stored, ValidationError};
use crate::media::MediaError;
use crate::store::StoreError;

pub use types::{DeleteTarget, SaveOutcome};

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{} not found", .0.noun())]
    NotFound(Collection),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl From<serde_json::Error> for MutationError {
    fn from(err: serde_json::Error) -> Self {
        MutationError::Store(StoreError::Decode(err))
    }
}

pub type MutationResult<T> = Result<T, MutationError>;

/// Field that holds a document's media-host reference.
const PUBLIC_ID_FIELD: &str = "publicId";

/// Keys owned by the store; patches may echo them back but never set them.
const ENVELOPE_KEYS: [&str; 4] = ["_id", "createdAt", "updatedAt", "__v"];

fn decode<T: Resource>(row: DocumentRow) -> MutationResult<Stored<T>> {
    Ok(Stored::from_row(row)?)
}

fn encode<T: Resource>(content: &T) -> MutationResult<Value> {
    Ok(serde_json::to_value(content)?)
}

/// Overlay the top-level fields of `patch` onto `base`.
fn merge_patch(mut base: Value, patch: Map<String, Value>) -> Value {
    if let Value::Object(fields) = &mut base {
        fields.retain(|k, _| !ENVELOPE_KEYS.contains(&k.as_str()));
        for (key, value) in patch {
            if !ENVELOPE_KEYS.contains(&key.as_str()) {
                fields.insert(key, value);
            }
        }
    }
    base
}

/// Clear `publicId` when `patch` points the image somewhere new without
/// naming its reference, so the stale one is not kept alongside the new URL.
fn forget_stale_reference<T: Resource>(current: &Value, patch: &mut Map<String, Value>) {
    let Some(field) = T::PATCHABLE_IMAGE else {
        return;
    };
    if patch.contains_key(PUBLIC_ID_FIELD) {
        return;
    }
    if let Some(next) = patch.get(field) {
        if next.is_string() && current.get(field) != Some(next) {
            patch.insert(PUBLIC_ID_FIELD.to_string(), Value::Null);
        }
    }
}

/// Decode client-supplied content. Shape errors are the caller's fault, so
/// they surface as validation errors rather than store errors.
fn from_patch<T: Resource>(value: Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::Invalid {
        field: "body",
        reason: e.to_string(),
    })
}

/// The old asset to delete when `next` replaces `current`: only when `next`
/// carries an image whose reference differs from the stored one.
fn replaced_asset<T: Resource>(current: &T, next: &T) -> Option<String> {
    next.asset_url()?;
    let old = current.asset_id()?;
    (next.asset_id().as_deref() != Some(old.as_str())).then_some(old)
}
