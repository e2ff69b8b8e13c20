//! Collections meant to hold a single document (About, Hero).
//!
//! "Single" is maintained by find-or-create only. Two writers racing on an
//! empty collection can both insert; readers then see the oldest document.

use serde_json::{Map, Value};

use super::types::SaveOutcome;
use super::{
    decode, encode, forget_stale_reference, merge_patch, replaced_asset, MutationError,
    MutationResult,
};
use crate::document::{Resource, Stored};
use crate::media::{self, MediaHost};
use crate::store::DocumentStore;

pub async fn get<T: Resource>(store: &dyn DocumentStore) -> MutationResult<Option<Stored<T>>> {
    match store.find_first(T::COLLECTION).await? {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// Create the singleton, or overwrite every content field of the existing
/// one. When the new value brings a different image, the previous image is
/// deleted from the media host first, best-effort.
pub async fn upsert<T: Resource>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    value: T,
) -> MutationResult<SaveOutcome<Stored<T>>> {
    upsert_with(store, media, move |_| value).await
}

/// [`upsert`] with a value built from the stored content, if any, for
/// resources that carry some fields across a save.
pub async fn upsert_with<T, F>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    build: F,
) -> MutationResult<SaveOutcome<Stored<T>>>
where
    T: Resource,
    F: FnOnce(Option<&T>) -> T + Send,
{
    let current: Option<Stored<T>> = match store.find_first(T::COLLECTION).await? {
        Some(row) => Some(decode(row)?),
        None => None,
    };
    let value = build(current.as_ref().map(|c| &c.content));
    value.validate()?;

    let Some(current) = current else {
        let row = store.insert(T::COLLECTION, encode(&value)?).await?;
        tracing::info!(collection = %T::COLLECTION, id = %row.id, "created singleton");
        return Ok(SaveOutcome::Created(decode(row)?));
    };

    if let Some(old) = replaced_asset(&current.content, &value) {
        media::release(media, &old).await;
    }

    let row = store
        .replace(T::COLLECTION, current.id, encode(&value)?)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    tracing::info!(collection = %T::COLLECTION, id = %row.id, "updated singleton");
    Ok(SaveOutcome::Updated(decode(row)?))
}

/// Merge only the supplied top-level fields into the singleton, creating it
/// from the patch when absent. Image replacement follows [`upsert`].
pub async fn patch<T: Resource>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    mut patch: Map<String, Value>,
) -> MutationResult<SaveOutcome<Stored<T>>> {
    let Some(row) = store.find_first(T::COLLECTION).await? else {
        let value: T = super::from_patch(merge_patch(Value::Object(Map::new()), patch))?;
        value.validate()?;
        let row = store.insert(T::COLLECTION, encode(&value)?).await?;
        return Ok(SaveOutcome::Created(decode(row)?));
    };

    let id = row.id;
    let current: T = serde_json::from_value(row.content.clone())?;
    forget_stale_reference::<T>(&row.content, &mut patch);
    let next: T = super::from_patch(merge_patch(row.content, patch))?;
    next.validate()?;

    if let Some(old) = replaced_asset(&current, &next) {
        media::release(media, &old).await;
    }

    let row = store
        .replace(T::COLLECTION, id, encode(&next)?)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    Ok(SaveOutcome::Updated(decode(row)?))
}

/// Remove the singleton and its image. Returns how many documents were
/// deleted, which is more than one only after a create race.
pub async fn clear<T: Resource>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
) -> MutationResult<u64> {
    if let Some(row) = store.find_first(T::COLLECTION).await? {
        let current: Stored<T> = decode(row)?;
        if let Some(public_id) = current.content.asset_id() {
            media::release(media, &public_id).await;
        }
    }
    let deleted = store.delete_all(T::COLLECTION).await?;
    tracing::info!(collection = %T::COLLECTION, deleted, "cleared singleton");
    Ok(deleted)
}
