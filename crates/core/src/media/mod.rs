//! Image storage on a third-party media host.
//!
//! The API never keeps image bytes itself: it stores the delivery URL and
//! the host's `public_id`, and asks the host to delete by `public_id` when
//! an image is replaced or its document removed.

pub mod cloudinary;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cloudinary::{CloudinaryClient, CloudinaryConfig};
pub use memory::MemoryMediaHost;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("media host rejected the request: {0}")]
    Rejected(String),
    #[error("media host is unavailable: {0}")]
    Unavailable(String),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Bytes waiting to be sent to the media host.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What the host hands back for a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, upload: PendingUpload) -> MediaResult<UploadedAsset>;

    async fn destroy(&self, public_id: &str) -> MediaResult<()>;
}

/// Delete an asset and log, rather than return, any failure.
///
/// Document writes must not be blocked by a media-host outage, so every
/// cleanup in the mutation flows goes through here.
pub async fn release(media: &dyn MediaHost, public_id: &str) {
    match media.destroy(public_id).await {
        Ok(()) => tracing::info!(public_id, "deleted media asset"),
        Err(err) => tracing::warn!(public_id, error = %err, "failed to delete media asset"),
    }
}

/// Recover a Cloudinary public id from a delivery URL.
///
/// `https://res.cloudinary.com/<cloud>/image/upload/[<transforms>/]v123/<folder>/<name>.<ext>`
/// maps to `<folder>/<name>`. Returns `None` for URLs that are not
/// Cloudinary uploads.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let segments: Vec<&str> = path.split('/').collect();
    let upload_at = segments.iter().position(|s| *s == "upload")?;
    let rest = &segments[upload_at + 1..];

    // A version segment only counts when nothing but transformations
    // precede it; otherwise `v2` is an ordinary folder name.
    let leading = rest.iter().take_while(|s| is_transformation(s)).count();
    let rest = match rest.get(leading) {
        Some(segment) if is_version_segment(segment) => &rest[leading + 1..],
        _ => rest,
    };
    let (last, folders) = rest.split_last()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => last,
    };
    if stem.is_empty() {
        return None;
    }

    let mut id = folders.join("/");
    if !id.is_empty() {
        id.push('/');
    }
    id.push_str(stem);
    Some(id)
}

/// `w_500,c_fill` and the like: comma-separated `<key>_<value>` pairs.
fn is_transformation(segment: &str) -> bool {
    segment.split(',').all(|part| {
        part.split_once('_').is_some_and(|(key, value)| {
            !key.is_empty()
                && key.len() <= 3
                && key.bytes().all(|b| b.is_ascii_lowercase())
                && !value.is_empty()
        })
    })
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_without_folder() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1712345678/abcd1234.jpg")
                .as_deref(),
            Some("abcd1234")
        );
    }

    #[test]
    fn public_id_keeps_folders() {
        assert_eq!(
            public_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v17/portfolio/lyrics/rain.png"
            )
            .as_deref(),
            Some("portfolio/lyrics/rain")
        );
    }

    #[test]
    fn public_id_skips_transformations() {
        assert_eq!(
            public_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/w_500,c_fill/v17/gallery/x.webp?_a=1"
            )
            .as_deref(),
            Some("gallery/x")
        );
    }

    #[test]
    fn version_like_folder_is_kept() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/albums/v2/x.jpg")
                .as_deref(),
            Some("albums/v2/x")
        );
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/v9/albums/v2/x.jpg")
                .as_deref(),
            Some("albums/v2/x")
        );
    }

    #[test]
    fn non_cloudinary_url_has_no_public_id() {
        assert_eq!(public_id_from_url("https://example.com/images/x.jpg"), None);
        assert_eq!(public_id_from_url("https://res.cloudinary.com/demo/image/upload/"), None);
    }

    #[tokio::test]
    async fn release_swallows_failures() {
        let host = MemoryMediaHost::failing_destroy();
        release(&host, "gone").await;
        assert_eq!(host.destroyed().await, vec!["gone".to_string()]);
    }
}
