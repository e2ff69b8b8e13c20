//! Collections of independent documents (posts, videos, gallery, activity).

use serde_json::{Map, Value};

use super::types::DeleteTarget;
use super::{
    decode, encode, forget_stale_reference, from_patch, merge_patch, replaced_asset, MutationError,
    MutationResult, PUBLIC_ID_FIELD,
};
use crate::content::AssetOwner;
use crate::document::{DocumentId, Resource, Stored};
use crate::media::{self, MediaHost, PendingUpload, UploadedAsset};
use crate::store::DocumentStore;

/// Parse a path id; ids that cannot exist resolve to NotFound.
pub fn parse_id<T: Resource>(raw: &str) -> MutationResult<DocumentId> {
    DocumentId::parse(raw).ok_or(MutationError::NotFound(T::COLLECTION))
}

pub async fn all<T: Resource>(store: &dyn DocumentStore) -> MutationResult<Vec<Stored<T>>> {
    let mut items = store
        .list(T::COLLECTION)
        .await?
        .into_iter()
        .map(decode)
        .collect::<MutationResult<Vec<Stored<T>>>>()?;
    items.sort_by(T::ordering);
    Ok(items)
}

pub async fn get<T: Resource>(
    store: &dyn DocumentStore,
    id: DocumentId,
) -> MutationResult<Stored<T>> {
    let row = store
        .find_by_id(T::COLLECTION, id)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    decode(row)
}

pub async fn create<T: Resource>(store: &dyn DocumentStore, value: T) -> MutationResult<Stored<T>> {
    value.validate()?;
    let row = store.insert(T::COLLECTION, encode(&value)?).await?;
    tracing::info!(collection = %T::COLLECTION, id = %row.id, "created document");
    decode(row)
}

/// Apply a partial update. Fields absent from `patch` keep their values; an
/// image change releases the previous asset as for singletons.
pub async fn update<T: Resource>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    id: DocumentId,
    mut patch: Map<String, Value>,
) -> MutationResult<Stored<T>> {
    let row = store
        .find_by_id(T::COLLECTION, id)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    let current: T = serde_json::from_value(row.content.clone())?;
    forget_stale_reference::<T>(&row.content, &mut patch);
    let next: T = from_patch(merge_patch(row.content, patch))?;
    next.validate()?;

    if let Some(old) = replaced_asset(&current, &next) {
        media::release(media, &old).await;
    }

    let row = store
        .replace(T::COLLECTION, id, encode(&next)?)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    tracing::info!(collection = %T::COLLECTION, %id, "updated document");
    decode(row)
}

/// Delete one document and, best-effort, its image.
pub async fn delete<T: Resource>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    target: DeleteTarget,
) -> MutationResult<Stored<T>> {
    let row = match &target {
        DeleteTarget::ById(id) => store.find_by_id(T::COLLECTION, *id).await?,
        DeleteTarget::ByPublicId(public_id) => {
            store
                .find_by_field(T::COLLECTION, PUBLIC_ID_FIELD, public_id)
                .await?
        }
    }
    .ok_or(MutationError::NotFound(T::COLLECTION))?;
    let doc: Stored<T> = decode(row)?;

    if let Some(public_id) = doc.content.asset_id() {
        media::release(media, &public_id).await;
    }
    if !store.delete_by_id(T::COLLECTION, doc.id).await? {
        return Err(MutationError::NotFound(T::COLLECTION));
    }
    tracing::info!(collection = %T::COLLECTION, id = %doc.id, "deleted document");
    Ok(doc)
}

/// Upload an image and insert the document built around it.
///
/// If the built document fails validation the fresh upload is released so
/// it does not linger on the media host.
pub async fn create_from_upload<T, F>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    upload: PendingUpload,
    build: F,
) -> MutationResult<Stored<T>>
where
    T: Resource,
    F: FnOnce(UploadedAsset) -> T + Send,
{
    let asset = media.upload(upload).await?;
    let public_id = asset.public_id.clone();
    let value = build(asset);
    if let Err(err) = value.validate() {
        media::release(media, &public_id).await;
        return Err(err.into());
    }
    create(store, value).await
}

/// Update a document, optionally swapping its image for a new upload.
///
/// The new image is uploaded and the edit validated before the old image is
/// released, so a rejected edit leaves the stored document intact.
pub async fn update_with_upload<T, F>(
    store: &dyn DocumentStore,
    media: &dyn MediaHost,
    id: DocumentId,
    upload: Option<PendingUpload>,
    apply: F,
) -> MutationResult<Stored<T>>
where
    T: Resource + AssetOwner,
    F: FnOnce(&mut T) + Send,
{
    let current: Stored<T> = get(store, id).await?;
    let mut next = current.content.clone();
    apply(&mut next);

    let fresh = match upload {
        Some(upload) => {
            let asset = media.upload(upload).await?;
            let public_id = asset.public_id.clone();
            next.attach(asset);
            Some(public_id)
        }
        None => None,
    };

    if let Err(err) = next.validate() {
        if let Some(public_id) = fresh {
            media::release(media, &public_id).await;
        }
        return Err(err.into());
    }
    if fresh.is_some() {
        if let Some(old) = current.content.asset_id() {
            media::release(media, &old).await;
        }
    }

    let row = store
        .replace(T::COLLECTION, id, encode(&next)?)
        .await?
        .ok_or(MutationError::NotFound(T::COLLECTION))?;
    tracing::info!(collection = %T::COLLECTION, %id, "updated document");
    decode(row)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::content::{Activity, GalleryImage, Post, Video};
    use crate::document::Collection;
    use crate::media::MemoryMediaHost;
    use crate::store::MemoryStore;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn png(name: &str) -> PendingUpload {
        PendingUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".into()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn post(title: &str) -> Post {
        serde_json::from_value(json!({ "title": title, "date": "2024-01-01" })).unwrap()
    }

    fn video(title: &str, order: i64) -> Video {
        Video {
            title: title.into(),
            youtube_id: "dQw4w9WgXcQ".into(),
            thumbnail: "https://img.youtube.com/t.jpg".into(),
            order,
        }
    }

    #[tokio::test]
    async fn posts_list_newest_first() {
        let store = MemoryStore::new();
        create(&store, post("first")).await.unwrap();
        create(&store, post("second")).await.unwrap();

        let posts = all::<Post>(&store).await.unwrap();

        let titles: Vec<_> = posts.iter().map(|p| p.content.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn videos_list_by_order_then_newest() {
        let store = MemoryStore::new();
        create(&store, video("late", 2)).await.unwrap();
        create(&store, video("early-old", 1)).await.unwrap();
        create(&store, video("early-new", 1)).await.unwrap();

        let videos = all::<Video>(&store).await.unwrap();

        let titles: Vec<_> = videos.iter().map(|v| v.content.title.as_str()).collect();
        assert_eq!(titles, vec!["early-new", "early-old", "late"]);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = get::<Post>(&store, DocumentId::new()).await.unwrap_err();
        assert!(matches!(err, MutationError::NotFound(Collection::Posts)));
        assert!(matches!(
            parse_id::<Post>("not-an-id"),
            Err(MutationError::NotFound(Collection::Posts))
        ));
    }

    #[tokio::test]
    async fn update_merges_patch() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create(&store, post("Rain")).await.unwrap();

        let updated = update::<Post>(
            &store,
            &media,
            created.id,
            object(json!({ "category": "Lyrics", "content": "verse" })),
        )
        .await
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content.title, "Rain");
        assert_eq!(updated.content.content.as_deref(), Some("verse"));
    }

    #[tokio::test]
    async fn new_image_url_without_reference_replaces_the_old_one() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create(
            &store,
            serde_json::from_value::<Post>(json!({
                "title": "Rain",
                "date": "2024-05-01",
                "image": "https://res.cloudinary.com/demo/image/upload/v1/lyrics/old.jpg",
                "publicId": "lyrics/old",
            }))
            .unwrap(),
        )
        .await
        .unwrap();

        let new_url = "https://res.cloudinary.com/demo/image/upload/v2/lyrics/new.jpg";
        let updated = update::<Post>(&store, &media, created.id, object(json!({ "image": new_url })))
            .await
            .unwrap();

        assert_eq!(updated.content.public_id, None);
        assert_eq!(updated.content.asset_id().as_deref(), Some("lyrics/new"));
        assert_eq!(media.destroyed().await, vec!["lyrics/old".to_string()]);

        delete::<Post>(&store, &media, DeleteTarget::ById(created.id))
            .await
            .unwrap();
        assert_eq!(
            media.destroyed().await,
            vec!["lyrics/old".to_string(), "lyrics/new".to_string()]
        );
    }

    #[tokio::test]
    async fn unchanged_image_keeps_reference() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create(
            &store,
            serde_json::from_value::<Post>(json!({
                "title": "Rain",
                "date": "2024-05-01",
                "image": "https://img/a.jpg",
                "publicId": "a",
            }))
            .unwrap(),
        )
        .await
        .unwrap();

        let updated = update::<Post>(
            &store,
            &media,
            created.id,
            object(json!({ "image": "https://img/a.jpg", "title": "Storm" })),
        )
        .await
        .unwrap();

        assert_eq!(updated.content.public_id.as_deref(), Some("a"));
        assert!(media.destroyed().await.is_empty());
    }

    #[tokio::test]
    async fn update_with_bad_field_is_validation_error() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create(&store, post("Rain")).await.unwrap();

        let err = update::<Post>(&store, &media, created.id, object(json!({ "category": "Poem" })))
            .await
            .unwrap_err();

        assert!(matches!(err, MutationError::Validation(_)));
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let err = update::<Video>(&store, &media, DocumentId::new(), Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::NotFound(Collection::Videos)));
    }

    #[tokio::test]
    async fn delete_by_public_id_removes_exactly_one() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        for n in 1..=3 {
            let image = GalleryImage {
                image_url: format!("https://img/{n}.jpg"),
                public_id: format!("g{n}"),
                title: None,
                description: None,
            };
            create(&store, image).await.unwrap();
        }

        let deleted = delete::<GalleryImage>(&store, &media, DeleteTarget::ByPublicId("g2".into()))
            .await
            .unwrap();

        assert_eq!(deleted.content.public_id, "g2");
        assert_eq!(media.destroyed().await, vec!["g2".to_string()]);
        let left: Vec<_> = all::<GalleryImage>(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.content.public_id)
            .collect();
        assert_eq!(left, vec!["g3".to_string(), "g1".to_string()]);
    }

    #[tokio::test]
    async fn delete_unknown_public_id_is_not_found() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let err = delete::<Activity>(&store, &media, DeleteTarget::ByPublicId("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::NotFound(Collection::Activity)));
        assert!(media.destroyed().await.is_empty());
    }

    #[tokio::test]
    async fn delete_survives_media_failure() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::failing_destroy();
        let mut value = post("Rain");
        value.image =
            Some("https://res.cloudinary.com/demo/image/upload/v17/lyrics/rain.jpg".into());
        let created = create(&store, value).await.unwrap();

        delete::<Post>(&store, &media, DeleteTarget::ById(created.id))
            .await
            .unwrap();

        assert_eq!(media.destroyed().await, vec!["lyrics/rain".to_string()]);
        assert_eq!(store.count(Collection::Posts).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_video_touches_no_media() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create(&store, video("v", 0)).await.unwrap();

        delete::<Video>(&store, &media, DeleteTarget::ById(created.id))
            .await
            .unwrap();

        assert!(media.destroyed().await.is_empty());
    }

    #[tokio::test]
    async fn create_from_upload_builds_document() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();

        let saved = create_from_upload(&store, &media, png("a.png"), |asset| {
            Activity::new("Studio".into(), "Recording day".into(), asset)
        })
        .await
        .unwrap();

        assert_eq!(saved.content.public_id, "asset-1");
        assert!(saved.content.image_url.ends_with("asset-1.png"));
    }

    #[tokio::test]
    async fn rejected_build_releases_fresh_upload() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();

        let err = create_from_upload(&store, &media, png("a.png"), |asset| {
            Activity::new(String::new(), "desc".into(), asset)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, MutationError::Validation(_)));
        assert_eq!(media.destroyed().await, vec!["asset-1".to_string()]);
        assert_eq!(store.count(Collection::Activity).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_upload_creates_nothing() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        media.set_fail_uploads(true);

        let err = create_from_upload(&store, &media, png("a.png"), GalleryImage::from_upload)
            .await
            .unwrap_err();

        assert!(matches!(err, MutationError::Media(_)));
        assert_eq!(store.count(Collection::Gallery).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_with_upload_swaps_image() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create_from_upload(&store, &media, png("a.png"), |asset| {
            Activity::new("Studio".into(), "Day one".into(), asset)
        })
        .await
        .unwrap();

        let updated = update_with_upload::<Activity, _>(
            &store,
            &media,
            created.id,
            Some(png("b.png")),
            |a| a.description = "Day two".into(),
        )
        .await
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content.public_id, "asset-2");
        assert_eq!(updated.content.title, "Studio");
        assert_eq!(updated.content.description, "Day two");
        assert_eq!(media.destroyed().await, vec!["asset-1".to_string()]);
    }

    #[tokio::test]
    async fn update_without_upload_keeps_image() {
        let store = MemoryStore::new();
        let media = MemoryMediaHost::new();
        let created = create_from_upload(&store, &media, png("a.png"), |asset| {
            Activity::new("Studio".into(), "Day one".into(), asset)
        })
        .await
        .unwrap();

        let updated =
            update_with_upload::<Activity, _>(&store, &media, created.id, None, |a| {
                a.title = "Tour".into()
            })
            .await
            .unwrap();

        assert_eq!(updated.content.public_id, "asset-1");
        assert_eq!(updated.content.title, "Tour");
        assert!(media.destroyed().await.is_empty());
    }
}
